use crate::scheduler::{Command, CommandKind, Sequence};

/// Attention-grabbing alert: switch to the alert color, flutter the
/// brightness 100→20→100→20→100 at 100 ms, then fall back to the normal
/// color after half a second at 50 % brightness.
pub fn alert(target: &str, alert_color: &str, normal_color: &str) -> Sequence {
    let brightness = |value: f64, delay: u64| {
        Command::new(CommandKind::Light, "brightness", target)
            .with_param("brightness", value)
            .with_delay_ms(delay)
    };

    let commands = vec![
        Command::new(CommandKind::Light, "color", target).with_param("color", alert_color),
        brightness(100.0, 100),
        brightness(20.0, 100),
        brightness(100.0, 100),
        brightness(20.0, 100),
        brightness(100.0, 100),
        Command::new(CommandKind::Light, "color", target)
            .with_param("color", normal_color)
            .with_delay_ms(500),
        brightness(50.0, 0),
    ];

    Sequence {
        id: String::new(),
        name: format!("Alert {target}"),
        commands,
        looping: false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn flutter_then_settle() {
        let seq = alert("l1", "#FF0000", "#FFFFFF");
        assert_eq!(seq.commands.len(), 8);

        let flutter: Vec<f64> = seq.commands[1..6]
            .iter()
            .map(|c| c.params.get("brightness").unwrap().as_f64().unwrap())
            .collect();
        assert_eq!(flutter, [100.0, 20.0, 100.0, 20.0, 100.0]);
        assert!(seq.commands[1..6].iter().all(|c| c.delay_ms == 100));

        assert_eq!(seq.commands[6].delay_ms, 500);
        assert_eq!(
            seq.commands[6].params.get("color").unwrap().as_str(),
            Some("#FFFFFF")
        );
        assert_eq!(
            seq.commands[7].params.get("brightness").unwrap().as_f64(),
            Some(50.0)
        );
    }
}
