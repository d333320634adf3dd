//! Configuration schema for the I2S RMS sensor.
//!
//! The host hands over one already-parsed configuration block as key/value
//! pairs. [`validate`] applies defaults, checks every option and produces the
//! immutable [`SensorConfig`] the binding works from.
//!
//! ```text
//! sensor:
//!   - platform: i2s_rms
//!     name: "Room loudness"
//!     update_interval: 50ms
//!     pin_bclk: 14
//!     pin_ws: 15
//!     pin_data: 32
//! ```

use core::fmt;

use heapless::String;

use crate::duration::{
    DurationError,
    UpdateInterval,
    parse_update_interval,
};

/// Default polling cadence.
pub const DEFAULT_UPDATE_INTERVAL: UpdateInterval = UpdateInterval::Millis(25);
/// Default bit clock pin.
pub const DEFAULT_PIN_BCLK: u8 = 26;
/// Default word select pin.
pub const DEFAULT_PIN_WS: u8 = 27;
/// Default serial data pin.
pub const DEFAULT_PIN_DATA: u8 = 33;
/// Default I2S sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
pub const DEFAULT_ICON: &str = "mdi:signal";
pub const DEFAULT_UNIT: &str = "";
pub const DEFAULT_ACCURACY_DECIMALS: i8 = 2;

/// Base used for ids generated for blocks without an `id`.
pub const GENERATED_ID_BASE: &str = "i2s_rms_sensor";

pub const SAMPLE_RATE_RANGE: core::ops::RangeInclusive<u32> = 8_000..=96_000;
pub const ACCURACY_DECIMALS_RANGE: core::ops::RangeInclusive<i64> = -3..=6;

/// Identifier of one component instance.
pub type ComponentId = String<32>;
pub type Name = String<48>;
pub type Icon = String<32>;
pub type Unit = String<16>;

/// A parsed configuration value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(&'a str),
}

/// Options recognised in a configuration block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OptionKey {
    Id,
    UpdateInterval,
    PinBclk,
    PinWs,
    PinData,
    SampleRate,
    Name,
    UnitOfMeasurement,
    Icon,
    AccuracyDecimals,
    Internal,
    DisabledByDefault,
}

impl OptionKey {
    pub const ALL: [OptionKey; 12] = [
        OptionKey::Id,
        OptionKey::UpdateInterval,
        OptionKey::PinBclk,
        OptionKey::PinWs,
        OptionKey::PinData,
        OptionKey::SampleRate,
        OptionKey::Name,
        OptionKey::UnitOfMeasurement,
        OptionKey::Icon,
        OptionKey::AccuracyDecimals,
        OptionKey::Internal,
        OptionKey::DisabledByDefault,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            OptionKey::Id => "id",
            OptionKey::UpdateInterval => "update_interval",
            OptionKey::PinBclk => "pin_bclk",
            OptionKey::PinWs => "pin_ws",
            OptionKey::PinData => "pin_data",
            OptionKey::SampleRate => "sample_rate",
            OptionKey::Name => "name",
            OptionKey::UnitOfMeasurement => "unit_of_measurement",
            OptionKey::Icon => "icon",
            OptionKey::AccuracyDecimals => "accuracy_decimals",
            OptionKey::Internal => "internal",
            OptionKey::DisabledByDefault => "disabled_by_default",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target chip, selects the GPIO map pins are checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Chip {
    Esp32,
    #[default]
    Esp32S3,
}

impl Chip {
    /// Whether `pin` names a GPIO on this chip.
    pub const fn has_gpio(self, pin: u8) -> bool {
        match self {
            Chip::Esp32 => matches!(pin, 0..=19 | 21..=23 | 25..=27 | 32..=39),
            Chip::Esp32S3 => matches!(pin, 0..=21 | 26..=48),
        }
    }

    /// Whether `pin` can drive a signal.
    pub const fn is_output_capable(self, pin: u8) -> bool {
        match self {
            Chip::Esp32 => self.has_gpio(pin) && pin < 34,
            Chip::Esp32S3 => self.has_gpio(pin),
        }
    }
}

/// I2S pin assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pins {
    pub bclk: u8,
    pub ws: u8,
    pub data: u8,
}

impl Pins {
    pub const DEFAULT: Pins = Pins {
        bclk: DEFAULT_PIN_BCLK,
        ws: DEFAULT_PIN_WS,
        data: DEFAULT_PIN_DATA,
    };

    /// Check the assignment can be routed on `chip`: every pin exists, BCLK
    /// and WS can drive, and no pin is used twice.
    pub fn check(self, chip: Chip) -> Result<(), ConfigError> {
        for (key, pin) in [
            (OptionKey::PinBclk, self.bclk),
            (OptionKey::PinWs, self.ws),
            (OptionKey::PinData, self.data),
        ] {
            if !chip.has_gpio(pin) {
                return Err(invalid(key, Invalid::NoSuchPin(i64::from(pin))));
            }
        }
        for (key, pin) in [(OptionKey::PinBclk, self.bclk), (OptionKey::PinWs, self.ws)] {
            if !chip.is_output_capable(pin) {
                return Err(invalid(key, Invalid::InputOnlyPin(pin)));
            }
        }
        if self.ws == self.bclk {
            return Err(invalid(OptionKey::PinWs, Invalid::PinInUse(self.ws)));
        }
        if self.data == self.bclk || self.data == self.ws {
            return Err(invalid(OptionKey::PinData, Invalid::PinInUse(self.data)));
        }
        Ok(())
    }
}

impl Default for Pins {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Generic sensor options every sensor platform inherits.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorMeta {
    pub name: Option<Name>,
    pub unit_of_measurement: Unit,
    pub icon: Icon,
    pub accuracy_decimals: i8,
    pub internal: bool,
    pub disabled_by_default: bool,
}

impl Default for SensorMeta {
    fn default() -> Self {
        Self {
            name: None,
            unit_of_measurement: bounded(DEFAULT_UNIT).unwrap_or_default(),
            icon: bounded(DEFAULT_ICON).unwrap_or_default(),
            accuracy_decimals: DEFAULT_ACCURACY_DECIMALS,
            internal: false,
            disabled_by_default: false,
        }
    }
}

/// A validated configuration block. Only [`validate`] creates these.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    id: ComponentId,
    pins: Pins,
    update_interval: UpdateInterval,
    sample_rate: u32,
    meta: SensorMeta,
}

impl SensorConfig {
    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn pins(&self) -> Pins {
        self.pins
    }

    pub fn update_interval(&self) -> UpdateInterval {
        self.update_interval
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn meta(&self) -> &SensorMeta {
        &self.meta
    }
}

/// Why a value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Invalid {
    ExpectedInt,
    ExpectedBool,
    ExpectedString,
    Duration(DurationError),
    /// No such GPIO on the target chip.
    NoSuchPin(i64),
    /// The pin cannot drive the clock lines.
    InputOnlyPin(u8),
    /// The pin is already used by another I2S line.
    PinInUse(u8),
    OutOfRange(i64),
    TooLong,
    /// Ids must look like `[A-Za-z_][A-Za-z0-9_]*`.
    MalformedId,
}

impl fmt::Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invalid::ExpectedInt => f.write_str("expected an integer"),
            Invalid::ExpectedBool => f.write_str("expected a boolean"),
            Invalid::ExpectedString => f.write_str("expected a string"),
            Invalid::Duration(e) => write!(f, "invalid duration: {e}"),
            Invalid::NoSuchPin(pin) => write!(f, "GPIO{pin} does not exist on this chip"),
            Invalid::InputOnlyPin(pin) => write!(f, "GPIO{pin} is input-only"),
            Invalid::PinInUse(pin) => write!(f, "GPIO{pin} is already assigned"),
            Invalid::OutOfRange(v) => write!(f, "value {v} is out of range"),
            Invalid::TooLong => f.write_str("value is too long"),
            Invalid::MalformedId => f.write_str("invalid id"),
        }
    }
}

/// Configuration validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The key at `position` is not a recognised option.
    UnknownOption { position: usize },
    DuplicateOption(OptionKey),
    Invalid { key: OptionKey, reason: Invalid },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownOption { position } => {
                write!(f, "option #{position} is not recognised")
            }
            ConfigError::DuplicateOption(key) => write!(f, "[{key}] is given more than once"),
            ConfigError::Invalid { key, reason } => write!(f, "[{key}] {reason}"),
        }
    }
}

impl core::error::Error for ConfigError {}

fn invalid(key: OptionKey, reason: Invalid) -> ConfigError {
    ConfigError::Invalid { key, reason }
}

fn bounded<const N: usize>(text: &str) -> Option<String<N>> {
    let mut s = String::new();
    s.push_str(text).ok()?;
    Some(s)
}

fn parse_int_str(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (radix, digits) = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => (16, hex),
        None => (10, digits),
    };
    // `from_str_radix` takes its own sign; only one is allowed, and only in front.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let magnitude = i128::from(u64::from_str_radix(digits, radix).ok()?);
    i64::try_from(if negative { -magnitude } else { magnitude }).ok()
}

fn as_int(key: OptionKey, value: Value<'_>) -> Result<i64, ConfigError> {
    match value {
        Value::Int(v) => Ok(v),
        Value::Float(v) if v.is_finite() && libm::trunc(v) == v => Ok(v as i64),
        Value::Str(s) => parse_int_str(s).ok_or(invalid(key, Invalid::ExpectedInt)),
        _ => Err(invalid(key, Invalid::ExpectedInt)),
    }
}

fn as_bool(key: OptionKey, value: Value<'_>) -> Result<bool, ConfigError> {
    match value {
        Value::Bool(b) => Ok(b),
        Value::Str(s) => {
            let s = s.trim();
            if ["true", "yes", "on", "enable"].iter().any(|t| s.eq_ignore_ascii_case(t)) {
                Ok(true)
            } else if ["false", "no", "off", "disable"]
                .iter()
                .any(|t| s.eq_ignore_ascii_case(t))
            {
                Ok(false)
            } else {
                Err(invalid(key, Invalid::ExpectedBool))
            }
        }
        _ => Err(invalid(key, Invalid::ExpectedBool)),
    }
}

fn as_str<'a>(key: OptionKey, value: Value<'a>) -> Result<&'a str, ConfigError> {
    match value {
        Value::Str(s) => Ok(s),
        _ => Err(invalid(key, Invalid::ExpectedString)),
    }
}

fn as_bounded<const N: usize>(key: OptionKey, value: Value<'_>) -> Result<String<N>, ConfigError> {
    bounded(as_str(key, value)?).ok_or(invalid(key, Invalid::TooLong))
}

fn as_pin(key: OptionKey, value: Value<'_>, chip: Chip) -> Result<u8, ConfigError> {
    let raw = as_int(key, value)?;
    u8::try_from(raw)
        .ok()
        .filter(|pin| chip.has_gpio(*pin))
        .ok_or(invalid(key, Invalid::NoSuchPin(raw)))
}

fn is_valid_id(id: &str) -> bool {
    let mut chars = id.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Id used for the `index`-th block that does not name one (0-based).
pub fn generated_id(index: u32) -> ComponentId {
    let mut id = ComponentId::new();
    // Both writes fit: the base is 14 bytes and a u32 suffix at most 11.
    let _ = id.push_str(GENERATED_ID_BASE);
    if index > 0 {
        let _ = fmt::write(&mut id, format_args!("_{}", index + 1));
    }
    id
}


/// Validate one configuration block for `chip`.
///
/// `generated_index` numbers blocks without an explicit `id`, see
/// [`generated_id`].
pub fn validate(
    block: &[(&str, Value<'_>)],
    chip: Chip,
    generated_index: u32,
) -> Result<SensorConfig, ConfigError> {
    let mut slots: [Option<Value<'_>>; OptionKey::ALL.len()] = [None; OptionKey::ALL.len()];
    for (position, (key, value)) in block.iter().enumerate() {
        let key = OptionKey::from_key(key).ok_or(ConfigError::UnknownOption { position })?;
        let slot = &mut slots[key.slot()];
        if slot.is_some() {
            return Err(ConfigError::DuplicateOption(key));
        }
        *slot = Some(*value);
    }
    let get = |key: OptionKey| slots[key.slot()];

    let id = match get(OptionKey::Id) {
        Some(value) => {
            let id: ComponentId = as_bounded(OptionKey::Id, value)?;
            if !is_valid_id(&id) {
                return Err(invalid(OptionKey::Id, Invalid::MalformedId));
            }
            id
        }
        None => generated_id(generated_index),
    };

    let update_interval = match get(OptionKey::UpdateInterval) {
        Some(value) => parse_update_interval(as_str(OptionKey::UpdateInterval, value)?)
            .map_err(|e| invalid(OptionKey::UpdateInterval, Invalid::Duration(e)))?,
        None => DEFAULT_UPDATE_INTERVAL,
    };

    let pin = |key: OptionKey, default: u8| match get(key) {
        Some(value) => as_pin(key, value, chip),
        None => Ok(default),
    };
    let pins = Pins {
        bclk: pin(OptionKey::PinBclk, DEFAULT_PIN_BCLK)?,
        ws: pin(OptionKey::PinWs, DEFAULT_PIN_WS)?,
        data: pin(OptionKey::PinData, DEFAULT_PIN_DATA)?,
    };
    pins.check(chip)?;

    let sample_rate = match get(OptionKey::SampleRate) {
        Some(value) => {
            let raw = as_int(OptionKey::SampleRate, value)?;
            u32::try_from(raw)
                .ok()
                .filter(|rate| SAMPLE_RATE_RANGE.contains(rate))
                .ok_or(invalid(OptionKey::SampleRate, Invalid::OutOfRange(raw)))?
        }
        None => DEFAULT_SAMPLE_RATE,
    };

    let mut meta = SensorMeta::default();
    if let Some(value) = get(OptionKey::Name) {
        meta.name = Some(as_bounded(OptionKey::Name, value)?);
    }
    if let Some(value) = get(OptionKey::UnitOfMeasurement) {
        meta.unit_of_measurement = as_bounded(OptionKey::UnitOfMeasurement, value)?;
    }
    if let Some(value) = get(OptionKey::Icon) {
        meta.icon = as_bounded(OptionKey::Icon, value)?;
    }
    if let Some(value) = get(OptionKey::AccuracyDecimals) {
        let raw = as_int(OptionKey::AccuracyDecimals, value)?;
        if !ACCURACY_DECIMALS_RANGE.contains(&raw) {
            return Err(invalid(OptionKey::AccuracyDecimals, Invalid::OutOfRange(raw)));
        }
        meta.accuracy_decimals = raw as i8;
    }
    if let Some(value) = get(OptionKey::Internal) {
        meta.internal = as_bool(OptionKey::Internal, value)?;
    }
    if let Some(value) = get(OptionKey::DisabledByDefault) {
        meta.disabled_by_default = as_bool(OptionKey::DisabledByDefault, value)?;
    }

    Ok(SensorConfig {
        id,
        pins,
        update_interval,
        sample_rate,
        meta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_block_takes_defaults() {
        let config = validate(&[], Chip::Esp32S3, 0).unwrap();
        assert_eq!(config.id().as_str(), "i2s_rms_sensor");
        assert_eq!(config.update_interval(), UpdateInterval::Millis(25));
        assert_eq!(config.pins(), Pins { bclk: 26, ws: 27, data: 33 });
        assert_eq!(config.sample_rate(), 44_100);
        assert_eq!(config.meta().unit_of_measurement.as_str(), "");
        assert_eq!(config.meta().icon.as_str(), "mdi:signal");
        assert_eq!(config.meta().accuracy_decimals, 2);
        assert_eq!(config.meta().name, None);
    }

    #[test]
    fn generated_ids_are_numbered() {
        assert_eq!(generated_id(0).as_str(), "i2s_rms_sensor");
        assert_eq!(generated_id(1).as_str(), "i2s_rms_sensor_2");
        assert_eq!(generated_id(9).as_str(), "i2s_rms_sensor_10");
    }

    #[test]
    fn accepts_overrides() {
        let block = [
            ("id", Value::Str("mic_level")),
            ("name", Value::Str("Room loudness")),
            ("update_interval", Value::Str("100ms")),
            ("pin_bclk", Value::Int(14)),
            ("pin_ws", Value::Str("15")),
            ("pin_data", Value::Float(32.0)),
            ("sample_rate", Value::Int(16_000)),
            ("accuracy_decimals", Value::Int(3)),
            ("internal", Value::Str("yes")),
        ];
        let config = validate(&block, Chip::Esp32S3, 0).unwrap();
        assert_eq!(config.id().as_str(), "mic_level");
        assert_eq!(config.meta().name.as_deref(), Some("Room loudness"));
        assert_eq!(config.update_interval(), UpdateInterval::Millis(100));
        assert_eq!(config.pins(), Pins { bclk: 14, ws: 15, data: 32 });
        assert_eq!(config.sample_rate(), 16_000);
        assert_eq!(config.meta().accuracy_decimals, 3);
        assert!(config.meta().internal);
    }

    #[test]
    fn rejects_unknown_and_duplicate_options() {
        let block = [("pin_bclk", Value::Int(14)), ("pin_mclk", Value::Int(0))];
        assert_eq!(
            validate(&block, Chip::Esp32S3, 0),
            Err(ConfigError::UnknownOption { position: 1 })
        );

        let block = [("pin_ws", Value::Int(14)), ("pin_ws", Value::Int(15))];
        assert_eq!(
            validate(&block, Chip::Esp32S3, 0),
            Err(ConfigError::DuplicateOption(OptionKey::PinWs))
        );
    }

    #[test]
    fn rejects_mistyped_values() {
        let block = [("pin_bclk", Value::Str("GPIO14"))];
        assert_eq!(
            validate(&block, Chip::Esp32S3, 0),
            Err(invalid(OptionKey::PinBclk, Invalid::ExpectedInt))
        );

        let block = [("pin_data", Value::Float(32.5))];
        assert_eq!(
            validate(&block, Chip::Esp32S3, 0),
            Err(invalid(OptionKey::PinData, Invalid::ExpectedInt))
        );

        let block = [("update_interval", Value::Int(25))];
        assert_eq!(
            validate(&block, Chip::Esp32S3, 0),
            Err(invalid(OptionKey::UpdateInterval, Invalid::ExpectedString))
        );

        let block = [("update_interval", Value::Str("soon"))];
        assert_eq!(
            validate(&block, Chip::Esp32S3, 0),
            Err(invalid(
                OptionKey::UpdateInterval,
                Invalid::Duration(DurationError::InvalidNumber)
            ))
        );
    }

    #[test]
    fn checks_pins_against_the_chip() {
        let block = [("pin_data", Value::Int(23))];
        assert_eq!(
            validate(&block, Chip::Esp32S3, 0),
            Err(invalid(OptionKey::PinData, Invalid::NoSuchPin(23)))
        );

        let block = [("pin_ws", Value::Int(-1))];
        assert_eq!(
            validate(&block, Chip::Esp32S3, 0),
            Err(invalid(OptionKey::PinWs, Invalid::NoSuchPin(-1)))
        );

        // 35 is an input, fine for data but not for a clock line.
        let block = [("pin_data", Value::Int(35))];
        assert!(validate(&block, Chip::Esp32, 0).is_ok());
        let block = [("pin_bclk", Value::Int(35))];
        assert_eq!(
            validate(&block, Chip::Esp32, 0),
            Err(invalid(OptionKey::PinBclk, Invalid::InputOnlyPin(35)))
        );
    }

    #[test]
    fn rejects_shared_pins() {
        let block = [("pin_data", Value::Int(26))];
        assert_eq!(
            validate(&block, Chip::Esp32S3, 0),
            Err(invalid(OptionKey::PinData, Invalid::PinInUse(26)))
        );

        let block = [("pin_ws", Value::Int(26))];
        assert_eq!(
            validate(&block, Chip::Esp32S3, 0),
            Err(invalid(OptionKey::PinWs, Invalid::PinInUse(26)))
        );
    }

    #[test]
    fn rejects_bad_ids_and_ranges() {
        let block = [("id", Value::Str("2nd-mic"))];
        assert_eq!(
            validate(&block, Chip::Esp32S3, 0),
            Err(invalid(OptionKey::Id, Invalid::MalformedId))
        );

        let block = [("sample_rate", Value::Int(1_000))];
        assert_eq!(
            validate(&block, Chip::Esp32S3, 0),
            Err(invalid(OptionKey::SampleRate, Invalid::OutOfRange(1_000)))
        );

        let block = [("accuracy_decimals", Value::Int(9))];
        assert_eq!(
            validate(&block, Chip::Esp32S3, 0),
            Err(invalid(OptionKey::AccuracyDecimals, Invalid::OutOfRange(9)))
        );
    }

    #[test]
    fn hex_pin_numbers_parse() {
        let block = [("pin_bclk", Value::Str("0x0E"))];
        let config = validate(&block, Chip::Esp32S3, 0).unwrap();
        assert_eq!(config.pins().bclk, 14);
    }

    #[test]
    fn stacked_signs_are_not_integers() {
        for text in ["--5", "-+5", "+-5", "0x-5", "-0x+5", "--9223372036854775808", "-", "0x"] {
            assert_eq!(parse_int_str(text), None, "{text}");
            let block = [("pin_bclk", Value::Str(text))];
            assert_eq!(
                validate(&block, Chip::Esp32S3, 0),
                Err(invalid(OptionKey::PinBclk, Invalid::ExpectedInt))
            );
        }
    }

    #[test]
    fn integer_strings_cover_the_i64_range() {
        assert_eq!(parse_int_str("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_int_str("+9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_int_str("9223372036854775808"), None);
        assert_eq!(parse_int_str("-0x10"), Some(-16));
        assert_eq!(parse_int_str(" 42 "), Some(42));
    }

    #[test]
    fn pin_check_rejects_pins_missing_on_the_chip() {
        let pins = Pins { bclk: 22, ws: 15, data: 32 };
        assert_eq!(
            pins.check(Chip::Esp32S3),
            Err(invalid(OptionKey::PinBclk, Invalid::NoSuchPin(22)))
        );
        assert!(pins.check(Chip::Esp32).is_ok());

        let pins = Pins { bclk: 14, ws: 15, data: 49 };
        assert_eq!(
            pins.check(Chip::Esp32S3),
            Err(invalid(OptionKey::PinData, Invalid::NoSuchPin(49)))
        );
        assert!(Pins::DEFAULT.check(Chip::Esp32S3).is_ok());
    }
}
