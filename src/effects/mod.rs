//! Pure builders that turn effect parameters into [`Sequence`] values.
//!
//! Nothing in this module touches the network; the scheduler owns
//! execution. Each builder lives in its own file with its tests.

pub mod alert;
pub mod color_loop;
pub mod fade;
pub mod flash;
pub mod pulse;
pub mod strobe;

pub use alert::alert;
pub use color_loop::color_loop;
pub use fade::fade;
pub use flash::flash;
pub use pulse::pulse;
pub use strobe::strobe;

use crate::color::RAINBOW_HEX;
use crate::scheduler::{CommandKind, Sequence};

/// Color loop over the seven canonical rainbow colors.
pub fn rainbow(target: &str, step_ms: u64) -> Sequence {
    let colors: Vec<String> = RAINBOW_HEX.iter().map(|c| (*c).to_string()).collect();
    color_loop(target, &colors, step_ms)
}

/// Deep-clone a sequence, rewriting every light command into a group
/// command against `group_id`. Scene commands are left alone.
pub fn groupify(seq: &Sequence, group_id: &str) -> Sequence {
    let commands = seq
        .commands
        .iter()
        .map(|cmd| {
            let mut cmd = cmd.clone();
            if cmd.kind == CommandKind::Light {
                cmd.kind = CommandKind::Group;
                cmd.target = group_id.to_string();
            }
            cmd
        })
        .collect();

    Sequence {
        id: String::new(),
        name: format!("Group {group_id} - {}", seq.name),
        commands,
        looping: seq.looping,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::scheduler::Command;

    #[test]
    fn rainbow_is_a_seven_color_loop() {
        let seq = rainbow("l1", 500);
        assert_eq!(seq.commands.len(), 7);
        assert!(seq.looping);
        assert_eq!(
            seq.commands[0].params.get("color").unwrap().as_str(),
            Some("#FF0000")
        );
        assert_eq!(
            seq.commands[6].params.get("color").unwrap().as_str(),
            Some("#9400D3")
        );
    }

    #[test]
    fn groupify_rewrites_light_commands_only() {
        let seq = Sequence {
            id: String::new(),
            name: "Mixed".to_string(),
            commands: vec![
                Command::new(CommandKind::Light, "on", "l1"),
                Command::new(CommandKind::Scene, "recall", "s1"),
            ],
            looping: true,
        };
        let grouped = groupify(&seq, "g9");
        assert_eq!(grouped.commands[0].kind, CommandKind::Group);
        assert_eq!(grouped.commands[0].target, "g9");
        assert_eq!(grouped.commands[1].kind, CommandKind::Scene);
        assert_eq!(grouped.commands[1].target, "s1");
        assert!(grouped.looping);
        // The original is untouched.
        assert_eq!(seq.commands[0].kind, CommandKind::Light);
    }
}
