use crate::scheduler::{Command, CommandKind, Sequence};

/// Pulse brightness between `min` and `max` percent. Each cycle is ten
/// linearly interpolated steps (five up, five down), every step lasting
/// a tenth of `cycle_ms`.
pub fn pulse(target: &str, min: f64, max: f64, cycle_ms: u64, count: u32) -> Sequence {
    let step_ms = cycle_ms / 10;
    let mut commands = Vec::with_capacity(count as usize * 10);

    for _ in 0..count {
        for j in 0..5 {
            let brightness = min + (max - min) * f64::from(j) / 5.0;
            commands.push(
                Command::new(CommandKind::Light, "brightness", target)
                    .with_param("brightness", brightness)
                    .with_delay_ms(step_ms),
            );
        }
        for j in (1..=5).rev() {
            let brightness = min + (max - min) * f64::from(j) / 5.0;
            commands.push(
                Command::new(CommandKind::Light, "brightness", target)
                    .with_param("brightness", brightness)
                    .with_delay_ms(step_ms),
            );
        }
    }

    Sequence {
        id: String::new(),
        name: format!("Pulse {target}"),
        commands,
        looping: false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn one_cycle_has_the_canonical_brightness_shape() {
        let seq = pulse("l1", 20.0, 80.0, 1000, 1);
        assert_eq!(seq.commands.len(), 10);

        let values: Vec<f64> = seq
            .commands
            .iter()
            .map(|c| c.params.get("brightness").unwrap().as_f64().unwrap())
            .collect();
        let expected = [20.0, 32.0, 44.0, 56.0, 68.0, 80.0, 68.0, 56.0, 44.0, 32.0];
        for (got, want) in values.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
        }

        assert!(seq.commands.iter().all(|c| c.delay_ms == 100));
        assert!(seq.commands.iter().all(|c| c.action == "brightness"));
    }

    #[test]
    fn cycles_multiply_the_step_count() {
        assert_eq!(pulse("l1", 10.0, 100.0, 2000, 3).commands.len(), 30);
    }
}
