//! Everything the skill says out loud.

use grip_session::Speed;

pub const WELCOME: &str = "Welcome, you can start issuing commands.";
pub const AWAITING: &str = "Awaiting your command.";
pub const NO_GADGET: &str = "I couldn't find a gadget connected to this device. \
                             Please check that your robot is connected, and try again.";
pub const REPEAT: &str = "Can you repeat that?";
pub const REPEAT_AGAIN: &str = "What was that again?";
pub const HELP: &str = "You can tell me to move in a direction, come here, bring or take something, \
                        set a speed, or activate a command like patrol or sentry.";
pub const GOODBYE: &str = "Goodbye!";
pub const SESSION_EXPIRED: &str = "Skill duration expired. Goodbye.";
pub const APOLOGY: &str = "Sorry, I had trouble doing what you asked. Please try again.";
pub const INTRUDER: &str = "Intruder detected! What would you like to do?";
pub const CLOSE_CALL: &str = "That was a close call.";
pub const THREAT_ELIMINATED: &str = "Threat eliminated";
pub const EVENT_NOT_RECOGNIZED: &str = "Event not recognized. Awaiting new command.";
pub const BRINGING: &str = "Bringing it to you";
pub const TAKING: &str = "Taking it away";

pub fn speed_set(speed: Speed) -> String {
    format!("speed set to {} percent.", speed)
}

pub fn moving(direction: &str, duration: &str, speed: Speed) -> String {
    format!("{} {} seconds at {} percent speed", direction, duration, speed)
}

pub fn coming(speed: Speed) -> String {
    format!("Coming to you at {} percent speed", speed)
}

pub fn command_activated(command: &str) -> String {
    format!("command {} activated", command)
}

/// Countdown for `remaining` renewals of `interval_ms` each. Whole minutes are
/// spoken as minutes, anything else as seconds.
pub fn time_remaining(remaining: u32, interval_ms: u64) -> String {
    let secs = u64::from(remaining) * interval_ms / 1000;
    if secs % 60 == 0 {
        format!("{} minutes remaining.", secs / 60)
    } else {
        format!("{} seconds remaining.", secs)
    }
}

pub fn intent_reflected(intent_name: &str) -> String {
    format!("You just triggered {}.", intent_name)
}

pub fn request_not_handled(request_type: &str) -> String {
    format!("Sorry, I don't know how to handle {} yet.", request_type)
}
