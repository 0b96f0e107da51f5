use crate::scheduler::{Command, CommandKind, Sequence};

/// Flash a light: set the color, then alternate on/off, `flash_ms`
/// between steps, `count` times over.
pub fn flash(target: &str, color: &str, count: u32, flash_ms: u64) -> Sequence {
    let mut commands = Vec::with_capacity(count as usize * 3);
    for _ in 0..count {
        commands.push(
            Command::new(CommandKind::Light, "color", target).with_param("color", color),
        );
        commands.push(Command::new(CommandKind::Light, "on", target).with_delay_ms(flash_ms));
        commands.push(Command::new(CommandKind::Light, "off", target).with_delay_ms(flash_ms));
    }

    Sequence {
        id: String::new(),
        name: format!("Flash {target}"),
        commands,
        looping: false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn two_flashes_produce_the_expected_step_train() {
        let seq = flash("l1", "#FF0000", 2, 100);
        assert!(!seq.looping);
        assert_eq!(seq.commands.len(), 6);

        let actions: Vec<&str> = seq.commands.iter().map(|c| c.action.as_str()).collect();
        assert_eq!(actions, ["color", "on", "off", "color", "on", "off"]);

        let delays: Vec<u64> = seq.commands.iter().map(|c| c.delay_ms).collect();
        assert_eq!(delays, [0, 100, 100, 0, 100, 100]);

        assert_eq!(
            seq.commands[0].params.get("color").unwrap().as_str(),
            Some("#FF0000")
        );
        assert!(seq.commands.iter().all(|c| c.target == "l1"));
    }
}
