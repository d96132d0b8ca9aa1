//! A remote-control scenario: moving the remote turns the backlight on, and
//! key presses that arrive while a blink animation is playing are deferred
//! instead of lost.
//!
//! Run with logging to watch the engine narrate each step:
//!
//! ```text
//! RUST_LOG=smengine=trace cargo run --example remote_control
//! ```

use smengine::{Event, MachineBuilder, StateHandler, TraceConfig, TraceLevel};

smengine::event_enum! {
    pub enum RemoteEvent {
        Move = 0,
        KeyDown = 1,
        BlinkDone = 2,
        BacklightOff = 3,
    }
}

/// Payload: which key was pressed, 0 when not applicable.
type KeyCode = u16;

struct Idle;
impl StateHandler<KeyCode> for Idle {}

struct BlinkPlaying;
impl StateHandler<KeyCode> for BlinkPlaying {
    fn enter(&mut self, _event: &Event<KeyCode>) {
        println!("blink: animation started, key presses will be deferred");
    }

    fn exit(&mut self, _event: &Event<KeyCode>) {
        println!("blink: animation finished");
    }
}

struct KeyPress;
impl StateHandler<KeyCode> for KeyPress {
    fn enter(&mut self, event: &Event<KeyCode>) {
        println!("keypress: handling key {}", event.payload);
    }
}

fn main() {
    env_logger::init();

    let mut builder = MachineBuilder::new("remote");
    builder.trace(TraceConfig {
        level: TraceLevel::Noise,
        capacity: 128,
    });

    let idle = builder.state("Idle", Idle);
    let blink = builder.state("BlinkPlaying", BlinkPlaying);
    let key_press = builder.state("KeyPress", KeyPress);

    builder.transition(idle, RemoteEvent::Move, blink);
    builder.transition(blink, RemoteEvent::BlinkDone, idle);
    builder.transition(idle, RemoteEvent::KeyDown, key_press);
    builder.transition(key_press, RemoteEvent::BacklightOff, idle);
    // While the blink plays, key presses wait instead of vanishing.
    builder.defer(blink, RemoteEvent::KeyDown);

    let mut machine = builder.build().expect("state graph is well formed");
    machine.init(idle);

    // The user moves the remote, then presses a key mid-animation.
    machine.enqueue(RemoteEvent::Move, 0);
    machine.enqueue(RemoteEvent::KeyDown, 42);
    machine.pump();

    assert!(machine.in_state(blink));
    assert_eq!(machine.deferred_len(), 1);
    println!("key press is parked while the blink plays");

    // The animation ends; the deferred key press replays on the same pump.
    machine.enqueue(RemoteEvent::BlinkDone, 0);
    machine.pump();

    assert!(machine.in_state(key_press));
    assert_eq!(machine.deferred_len(), 0);

    println!("--- trace ---");
    println!("{}", machine.trace().export_json().expect("trace serializes"));
}
