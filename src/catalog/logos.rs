//! Channel logo path resolution

use crate::models::Channel;

/// Resolve a provider logo reference against the configured logo base path
pub fn resolve_logo(reference: &str, logo_path: &str) -> String {
    if !logo_path.is_empty() && !reference.contains("://") {
        path_combine(logo_path, reference)
    } else {
        reference.to_string()
    }
}

/// Join two path fragments with exactly one separator between them
pub fn path_combine(base: &str, file: &str) -> String {
    if base.is_empty() {
        return file.to_string();
    }
    if file.is_empty() {
        return base.to_string();
    }

    // Windows style base paths keep their separator
    let separator = if base.contains('\\') && !base.contains('/') { '\\' } else { '/' };
    let base = base.trim_end_matches(['/', '\\']);
    let file = file.trim_start_matches(['/', '\\']);

    format!("{}{}{}", base, separator, file)
}

pub fn apply_channel_logos(channels: &mut [Channel], logo_path: &str) {
    for channel in channels.iter_mut().filter(|c| !c.tag_logo.is_empty()) {
        channel.logo_path = resolve_logo(&channel.tag_logo, logo_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_scheme_passes_through() {
        assert_eq!(
            resolve_logo("http://cdn.local/ard.png", "/srv/logos"),
            "http://cdn.local/ard.png"
        );
        assert_eq!(
            resolve_logo("special://home/logos/ard.png", "/srv/logos"),
            "special://home/logos/ard.png"
        );
    }

    #[test]
    fn test_resolve_joins_base_path() {
        assert_eq!(resolve_logo("ard.png", "/srv/logos"), "/srv/logos/ard.png");
        assert_eq!(resolve_logo("/ard.png", "/srv/logos/"), "/srv/logos/ard.png");
        assert_eq!(
            resolve_logo("ard.png", "http://cdn.local/logos/"),
            "http://cdn.local/logos/ard.png"
        );
    }

    #[test]
    fn test_resolve_without_base_path() {
        assert_eq!(resolve_logo("ard.png", ""), "ard.png");
    }

    #[test]
    fn test_path_combine_windows_base() {
        assert_eq!(path_combine("C:\\logos\\", "ard.png"), "C:\\logos\\ard.png");
    }

    #[test]
    fn test_path_combine_empty_parts() {
        assert_eq!(path_combine("", "ard.png"), "ard.png");
        assert_eq!(path_combine("/srv/logos", ""), "/srv/logos");
    }

    #[test]
    fn test_apply_channel_logos() {
        let mut channels = vec![
            Channel {
                tag_logo: "ard.png".to_string(),
                logo_path: "ard.png".to_string(),
                ..Default::default()
            },
            Channel {
                tag_logo: "https://cdn.local/zdf.png".to_string(),
                logo_path: "https://cdn.local/zdf.png".to_string(),
                ..Default::default()
            },
            Channel::default(),
        ];

        apply_channel_logos(&mut channels, "/srv/logos");

        assert_eq!(channels[0].logo_path, "/srv/logos/ard.png");
        assert_eq!(channels[1].logo_path, "https://cdn.local/zdf.png");
        assert_eq!(channels[2].logo_path, "");
    }
}
