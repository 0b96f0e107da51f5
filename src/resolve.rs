//! Fuzzy resolution of user-facing names to bridge ids.
//!
//! Inputs that already look like bridge UUIDs pass through untouched.
//! Otherwise: case-insensitive exact match on the name, then substring
//! match; anything ambiguous fails with a listing of the candidates so
//! the caller can be more specific.

use crate::bridge::BridgeClient;
use crate::error::AppError;

/// Bridge UUIDs are dashed and long; user-facing names are neither.
fn looks_like_uuid(s: &str) -> bool {
    s.contains('-') && s.len() > 30
}

fn format_matches(matches: &[(String, String)]) -> String {
    matches
        .iter()
        .map(|(name, id)| format!("  - {name} (ID: {id})"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pick one id from `(name, id)` candidates: case-insensitive exact match
/// first, then case-insensitive substring. Anything other than a single
/// hit is a resolution error listing every candidate.
fn match_by_name(
    candidates: &[(String, String)],
    needle: &str,
    what: &str,
) -> Result<String, AppError> {
    if let Some((_, id)) = candidates
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(needle))
    {
        return Ok(id.clone());
    }

    let needle_lower = needle.to_lowercase();
    let matches: Vec<(String, String)> = candidates
        .iter()
        .filter(|(name, _)| name.to_lowercase().contains(&needle_lower))
        .cloned()
        .collect();

    match matches.len() {
        0 => Err(AppError::Resolution {
            message: format!("no {what} found matching '{needle}'"),
        }),
        1 => Ok(matches[0].1.clone()),
        _ => Err(AppError::Resolution {
            message: format!(
                "multiple {what} matches for '{needle}':\n{}\nPlease be more specific",
                format_matches(&matches)
            ),
        }),
    }
}

/// Resolve a light name or id to a light id.
pub async fn resolve_light(client: &BridgeClient, name_or_id: &str) -> Result<String, AppError> {
    if looks_like_uuid(name_or_id) {
        return Ok(name_or_id.to_string());
    }

    let lights = client.get_lights().await?;
    let candidates: Vec<(String, String)> = lights
        .iter()
        .map(|l| (l.metadata.name.clone(), l.id.clone()))
        .collect();
    match_by_name(&candidates, name_or_id, "light")
}

/// Resolve a room or zone name to its grouped-light id. Raw grouped-light
/// UUIDs pass through; a matching room or zone yields the id of its
/// grouped-light service, never the room id itself.
pub async fn resolve_group(client: &BridgeClient, name_or_id: &str) -> Result<String, AppError> {
    if looks_like_uuid(name_or_id) {
        return Ok(name_or_id.to_string());
    }

    // (name, grouped-light id) for every room and zone that has one.
    let mut groups: Vec<(String, String)> = Vec::new();
    for room in client.get_rooms().await? {
        if let Some(gid) = room.grouped_light_id() {
            groups.push((room.metadata.name.clone(), gid.to_string()));
        }
    }
    for zone in client.get_zones().await? {
        if let Some(gid) = zone.grouped_light_id() {
            groups.push((zone.metadata.name.clone(), gid.to_string()));
        }
    }

    match_by_name(&groups, name_or_id, "room/group")
}

/// Resolve a scene name or id to a scene id.
///
/// The input may carry a room disambiguator, `name:room`, constraining
/// the match by (substring of) the parent room or zone name. Candidate
/// listings include the parent room so the caller can pick one.
pub async fn resolve_scene(client: &BridgeClient, name_or_id: &str) -> Result<String, AppError> {
    if looks_like_uuid(name_or_id) {
        return Ok(name_or_id.to_string());
    }

    let (scene_name, room_filter) = match name_or_id.split_once(':') {
        Some((name, room)) => (name.trim(), Some(room.trim())),
        None => (name_or_id.trim(), None),
    };

    let scenes = client.get_scenes().await?;

    // Parent-group lookup used for disambiguation output and room filters.
    let mut group_names: Vec<(String, String)> = Vec::new();
    for room in client.get_rooms().await? {
        group_names.push((room.id.clone(), room.metadata.name.clone()));
    }
    if let Ok(zones) = client.get_zones().await {
        for zone in zones {
            group_names.push((zone.id.clone(), zone.metadata.name.clone()));
        }
    }
    let room_name = |scene: &crate::bridge::types::Scene| -> String {
        group_names
            .iter()
            .find(|(id, _)| *id == scene.group.rid)
            .map(|(_, name)| name.clone())
            .unwrap_or_default()
    };

    let describe = |matches: &[(String, String, String)]| -> String {
        matches
            .iter()
            .map(|(name, room, id)| {
                if room.is_empty() {
                    format!("  - {name} [ID: {id}]")
                } else {
                    format!("  - {name} ({room}) [ID: {id}]")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    if let Some(filter) = room_filter {
        let filter_lower = filter.to_lowercase();
        let matches: Vec<(String, String, String)> = scenes
            .iter()
            .filter(|s| {
                s.metadata.name.eq_ignore_ascii_case(scene_name)
                    && room_name(s).to_lowercase().contains(&filter_lower)
            })
            .map(|s| (s.metadata.name.clone(), room_name(s), s.id.clone()))
            .collect();

        match matches.len() {
            1 => return Ok(matches[0].2.clone()),
            n if n > 1 => {
                return Err(AppError::Resolution {
                    message: format!(
                        "multiple scenes match '{scene_name}' in rooms containing '{filter}':\n{}\nPlease be more specific",
                        describe(&matches)
                    ),
                })
            }
            // No match under the filter; fall through to the unfiltered
            // search so the caller at least sees what exists.
            _ => {}
        }
    }

    let exact: Vec<(String, String, String)> = scenes
        .iter()
        .filter(|s| s.metadata.name.eq_ignore_ascii_case(scene_name))
        .map(|s| (s.metadata.name.clone(), room_name(s), s.id.clone()))
        .collect();

    match exact.len() {
        1 => return Ok(exact[0].2.clone()),
        n if n > 1 => {
            return Err(AppError::Resolution {
                message: format!(
                    "multiple scenes named '{scene_name}':\n{}\nSpecify the room like: '{scene_name}:Room Name'",
                    describe(&exact)
                ),
            })
        }
        _ => {}
    }

    let needle = scene_name.to_lowercase();
    let partial: Vec<(String, String, String)> = scenes
        .iter()
        .filter(|s| s.metadata.name.to_lowercase().contains(&needle))
        .map(|s| (s.metadata.name.clone(), room_name(s), s.id.clone()))
        .collect();

    match partial.len() {
        0 => Err(AppError::Resolution {
            message: format!("no scene found matching '{name_or_id}'"),
        }),
        1 => Ok(partial[0].2.clone()),
        _ => Err(AppError::Resolution {
            message: format!(
                "multiple scenes match '{name_or_id}':\n{}\nPlease be more specific",
                describe(&partial)
            ),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn uuid_heuristic() {
        assert!(looks_like_uuid("15f36a9c-87f8-4fbe-ab26-63b1ad1a1b07"));
        assert!(!looks_like_uuid("Living Room"));
        assert!(!looks_like_uuid("lamp-2"));
        // Dashed but short: still a name.
        assert!(!looks_like_uuid("kitchen-spot"));
    }

    fn candidates() -> Vec<(String, String)> {
        vec![
            ("Desk Lamp".to_string(), "id-desk".to_string()),
            ("Floor Lamp".to_string(), "id-floor".to_string()),
            ("Kitchen Spot".to_string(), "id-kitchen".to_string()),
        ]
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        assert_eq!(
            match_by_name(&candidates(), "desk lamp", "light").unwrap(),
            "id-desk"
        );
    }

    #[test]
    fn single_substring_match_resolves() {
        assert_eq!(
            match_by_name(&candidates(), "kitchen", "light").unwrap(),
            "id-kitchen"
        );
    }

    #[test]
    fn ambiguous_names_list_every_candidate() {
        let err = match_by_name(&candidates(), "lamp", "light").unwrap_err();
        let AppError::Resolution { message } = err else {
            panic!("expected a resolution error");
        };
        assert!(message.contains("id-desk"));
        assert!(message.contains("id-floor"));
        assert!(message.contains("be more specific"));
    }

    #[test]
    fn no_match_is_an_error() {
        assert!(matches!(
            match_by_name(&candidates(), "garage", "light"),
            Err(AppError::Resolution { .. })
        ));
    }
}
