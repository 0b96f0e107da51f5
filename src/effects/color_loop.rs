use crate::scheduler::{Command, CommandKind, Sequence};

/// Cycle through a list of colors, one set per `transition_ms`. The
/// resulting sequence loops until stopped.
pub fn color_loop(target: &str, colors: &[String], transition_ms: u64) -> Sequence {
    let commands = colors
        .iter()
        .map(|color| {
            Command::new(CommandKind::Light, "color", target)
                .with_param("color", color.as_str())
                .with_delay_ms(transition_ms)
        })
        .collect();

    Sequence {
        id: String::new(),
        name: format!("ColorLoop {target}"),
        commands,
        looping: true,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn loops_one_command_per_color() {
        let colors = vec!["#FF0000".to_string(), "#00FF00".to_string()];
        let seq = color_loop("l1", &colors, 250);
        assert!(seq.looping);
        assert_eq!(seq.commands.len(), 2);
        assert_eq!(
            seq.commands[1].params.get("color").unwrap().as_str(),
            Some("#00FF00")
        );
        assert!(seq.commands.iter().all(|c| c.delay_ms == 250));
    }
}
