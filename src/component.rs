//! Host framework hooks: components, polling components and sensors.

use embassy_futures::select::{
    Either,
    select,
};
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    signal::Signal,
};
use embassy_time::Ticker;

use crate::{
    config::SensorMeta,
    duration::UpdateInterval,
};

/// Channel a sensor publishes its readings on.
pub type StateSignal = Signal<CriticalSectionRawMutex, f32>;

/// Channel carrying [`Control`] commands to a running component.
pub type ControlSignal = Signal<CriticalSectionRawMutex, Control>;

/// Lifecycle hooks every component has.
pub trait Component {
    /// Called once before the first update.
    fn setup(&mut self) {}

    /// Log the effective configuration.
    fn dump_config(&self) {}

    /// Handle a start/stop request.
    fn control(&mut self, _command: Control) {}
}

/// A component the scheduler updates at a fixed interval.
#[allow(async_fn_in_trait)]
pub trait PollingComponent: Component {
    async fn update(&mut self);

    fn update_interval(&self) -> UpdateInterval;

    fn set_update_interval(&mut self, interval: UpdateInterval);
}

/// Something that publishes a scalar state.
pub trait Sensor<'a> {
    fn core(&self) -> &SensorCore<'a>;

    fn core_mut(&mut self) -> &mut SensorCore<'a>;

    fn publish_state(&mut self, state: f32) {
        self.core_mut().publish_state(state);
    }

    fn state(&self) -> Option<f32> {
        self.core().state()
    }
}

/// Commands accepted by a running component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Control {
    Start,
    Stop,
}

/// Published state and presentation metadata shared by all sensors.
#[derive(Default)]
pub struct SensorCore<'a> {
    meta: SensorMeta,
    state: Option<f32>,
    published: u32,
    sink: Option<&'a StateSignal>,
}

impl<'a> SensorCore<'a> {
    pub fn new(meta: SensorMeta) -> Self {
        Self {
            meta,
            ..Self::default()
        }
    }

    pub fn meta(&self) -> &SensorMeta {
        &self.meta
    }

    pub fn set_meta(&mut self, meta: SensorMeta) {
        self.meta = meta;
    }

    /// Forward every published state to `sink` as well.
    pub fn set_sink(&mut self, sink: &'a StateSignal) {
        self.sink = Some(sink);
    }

    /// Last published state, `None` before the first publish.
    pub fn state(&self) -> Option<f32> {
        self.state
    }

    /// Number of states published so far.
    pub fn publish_count(&self) -> u32 {
        self.published
    }

    pub fn name(&self) -> &str {
        self.meta.name.as_deref().unwrap_or("")
    }

    pub fn publish_state(&mut self, state: f32) {
        debug!("'{}': sending state {}", self.name(), state);
        self.state = Some(state);
        self.published = self.published.wrapping_add(1);
        if let Some(sink) = self.sink {
            sink.signal(state);
        }
    }
}

/// Source of update ticks for [`drive`].
#[allow(async_fn_in_trait)]
pub trait Tick {
    /// Wait for the next tick.
    async fn tick(&mut self);
}

impl Tick for Ticker {
    async fn tick(&mut self) {
        self.next().await
    }
}

/// Drive `component`: set it up, then update it every interval while
/// applying commands from `control`.
///
/// With [`UpdateInterval::Never`] only commands are handled.
pub async fn run<C: PollingComponent>(component: &mut C, control: &ControlSignal) -> ! {
    let ticker = component.update_interval().as_duration().map(Ticker::every);
    drive(component, control, ticker).await
}

/// [`run`] with an explicit tick source. `None` handles commands only.
pub async fn drive<C, T>(component: &mut C, control: &ControlSignal, ticks: Option<T>) -> !
where
    C: PollingComponent,
    T: Tick,
{
    component.setup();
    component.dump_config();

    let Some(mut ticks) = ticks else {
        loop {
            let command = control.wait().await;
            component.control(command);
        }
    };

    loop {
        match select(ticks.tick(), control.wait()).await {
            Either::First(()) => component.update().await,
            Either::Second(command) => component.control(command),
        }
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use embassy_futures::{
        block_on,
        yield_now,
    };

    use super::*;

    type TickSignal = Signal<CriticalSectionRawMutex, ()>;

    impl Tick for &TickSignal {
        async fn tick(&mut self) {
            self.wait().await
        }
    }

    #[derive(Default)]
    struct Events {
        setup: Cell<u32>,
        dumped: Cell<u32>,
        updates: Cell<u32>,
        last_command: Cell<Option<Control>>,
        updates_at_setup: Cell<Option<u32>>,
    }

    struct Recorder<'a> {
        events: &'a Events,
        interval: UpdateInterval,
    }

    impl Component for Recorder<'_> {
        fn setup(&mut self) {
            self.events.setup.set(self.events.setup.get() + 1);
            self.events.updates_at_setup.set(Some(self.events.updates.get()));
        }

        fn dump_config(&self) {
            self.events.dumped.set(self.events.dumped.get() + 1);
        }

        fn control(&mut self, command: Control) {
            self.events.last_command.set(Some(command));
        }
    }

    impl PollingComponent for Recorder<'_> {
        async fn update(&mut self) {
            self.events.updates.set(self.events.updates.get() + 1);
        }

        fn update_interval(&self) -> UpdateInterval {
            self.interval
        }

        fn set_update_interval(&mut self, interval: UpdateInterval) {
            self.interval = interval;
        }
    }

    #[test]
    fn drive_sets_up_then_updates_on_ticks_and_applies_commands() {
        let events = Events::default();
        let ticks = TickSignal::new();
        let control = ControlSignal::new();
        let mut component = Recorder {
            events: &events,
            interval: UpdateInterval::Millis(25),
        };

        let steps = async {
            yield_now().await;
            assert_eq!(events.setup.get(), 1);
            assert_eq!(events.dumped.get(), 1);
            assert_eq!(events.updates_at_setup.get(), Some(0));
            assert_eq!(events.updates.get(), 0);

            ticks.signal(());
            yield_now().await;
            assert_eq!(events.updates.get(), 1);

            control.signal(Control::Start);
            yield_now().await;
            assert_eq!(events.last_command.get(), Some(Control::Start));
            assert_eq!(events.updates.get(), 1);

            for _ in 0..2 {
                ticks.signal(());
                yield_now().await;
            }
            assert_eq!(events.updates.get(), 3);

            control.signal(Control::Stop);
            yield_now().await;
            assert_eq!(events.last_command.get(), Some(Control::Stop));
        };

        match block_on(select(drive(&mut component, &control, Some(&ticks)), steps)) {
            Either::First(_) => unreachable!(),
            Either::Second(()) => assert_eq!(events.setup.get(), 1),
        }
    }

    #[test]
    fn drive_without_ticks_only_handles_commands() {
        let events = Events::default();
        let control = ControlSignal::new();
        let mut component = Recorder {
            events: &events,
            interval: UpdateInterval::Never,
        };

        let steps = async {
            yield_now().await;
            assert_eq!(events.setup.get(), 1);
            assert_eq!(events.dumped.get(), 1);

            control.signal(Control::Start);
            yield_now().await;
            assert_eq!(events.last_command.get(), Some(Control::Start));

            for _ in 0..4 {
                yield_now().await;
            }
            assert_eq!(events.updates.get(), 0);
        };

        match block_on(select(drive(&mut component, &control, None::<&TickSignal>), steps)) {
            Either::First(_) => unreachable!(),
            Either::Second(()) => assert_eq!(events.updates.get(), 0),
        }
    }

    #[test]
    fn publish_updates_state_and_sink() {
        let sink = StateSignal::new();
        let mut core = SensorCore::new(SensorMeta::default());
        assert_eq!(core.state(), None);

        core.set_sink(&sink);
        core.publish_state(0.5);
        core.publish_state(0.75);

        assert_eq!(core.state(), Some(0.75));
        assert_eq!(core.publish_count(), 2);
        assert_eq!(sink.try_take(), Some(0.75));
        assert_eq!(sink.try_take(), None);
    }

    #[test]
    fn unnamed_sensor_has_empty_name() {
        let core = SensorCore::new(SensorMeta::default());
        assert_eq!(core.name(), "");
        assert_eq!(core.meta().icon.as_str(), "mdi:signal");
    }
}
