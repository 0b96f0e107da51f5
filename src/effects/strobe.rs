use crate::scheduler::{Command, CommandKind, Sequence};

/// Strobe: set the color once, then on/off pairs at `rate_ms`, enough
/// pairs to fill `total_ms`.
pub fn strobe(target: &str, color: &str, rate_ms: u64, total_ms: u64) -> Sequence {
    let iterations = if rate_ms == 0 {
        0
    } else {
        total_ms / (rate_ms * 2)
    };

    let mut commands = Vec::with_capacity(1 + iterations as usize * 2);
    commands.push(
        Command::new(CommandKind::Light, "color", target).with_param("color", color),
    );
    for _ in 0..iterations {
        commands.push(Command::new(CommandKind::Light, "on", target).with_delay_ms(rate_ms));
        commands.push(Command::new(CommandKind::Light, "off", target).with_delay_ms(rate_ms));
    }

    Sequence {
        id: String::new(),
        name: format!("Strobe {target}"),
        commands,
        looping: false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn fills_the_duration_with_on_off_pairs() {
        // 5000 / (100 * 2) = 25 pairs.
        let seq = strobe("l1", "#FFFFFF", 100, 5000);
        assert_eq!(seq.commands.len(), 1 + 25 * 2);
        assert_eq!(seq.commands[0].action, "color");
        assert_eq!(seq.commands[0].delay_ms, 0);
        assert_eq!(seq.commands[1].action, "on");
        assert_eq!(seq.commands[2].action, "off");
        assert!(seq.commands[1..].iter().all(|c| c.delay_ms == 100));
    }

    #[test]
    fn zero_rate_degenerates_to_the_color_set() {
        assert_eq!(strobe("l1", "#FFFFFF", 0, 5000).commands.len(), 1);
    }
}
