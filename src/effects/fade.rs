use crate::scheduler::{Command, CommandKind, Sequence};

/// Fade between two states: set the starting color and brightness, ramp
/// the brightness linearly over `steps` steps of `total_ms / steps`, then
/// set the final color. Color itself is not interpolated.
#[allow(clippy::too_many_arguments)]
pub fn fade(
    target: &str,
    start_color: &str,
    end_color: &str,
    start_brightness: f64,
    end_brightness: f64,
    total_ms: u64,
    steps: u32,
) -> Sequence {
    let steps = steps.max(1);
    let step_ms = total_ms / u64::from(steps);

    let mut commands = Vec::with_capacity(steps as usize + 3);
    commands.push(
        Command::new(CommandKind::Light, "color", target).with_param("color", start_color),
    );
    commands.push(
        Command::new(CommandKind::Light, "brightness", target)
            .with_param("brightness", start_brightness),
    );

    for i in 1..=steps {
        let progress = f64::from(i) / f64::from(steps);
        let brightness = start_brightness + (end_brightness - start_brightness) * progress;
        commands.push(
            Command::new(CommandKind::Light, "brightness", target)
                .with_param("brightness", brightness)
                .with_delay_ms(step_ms),
        );
    }

    commands.push(
        Command::new(CommandKind::Light, "color", target).with_param("color", end_color),
    );

    Sequence {
        id: String::new(),
        name: format!("Fade {target}"),
        commands,
        looping: false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn ramps_brightness_and_bookends_with_colors() {
        let seq = fade("l1", "#FF0000", "#0000FF", 0.0, 100.0, 1000, 4);
        // start color + start brightness + 4 ramp steps + end color
        assert_eq!(seq.commands.len(), 7);

        assert_eq!(seq.commands[0].action, "color");
        assert_eq!(seq.commands[1].action, "brightness");

        let ramp: Vec<f64> = seq.commands[2..6]
            .iter()
            .map(|c| c.params.get("brightness").unwrap().as_f64().unwrap())
            .collect();
        assert_eq!(ramp, [25.0, 50.0, 75.0, 100.0]);
        assert!(seq.commands[2..6].iter().all(|c| c.delay_ms == 250));

        assert_eq!(
            seq.commands[6].params.get("color").unwrap().as_str(),
            Some("#0000FF")
        );
        assert_eq!(seq.commands[6].delay_ms, 0);
    }

    #[test]
    fn zero_steps_is_clamped() {
        let seq = fade("l1", "#000000", "#FFFFFF", 0.0, 100.0, 1000, 0);
        assert_eq!(seq.commands.len(), 4);
    }
}
