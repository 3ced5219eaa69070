fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use traybridge_protocol::{
        HelperMessage, HostMessage, Icon, IconFormat, MenuItem, MenuRole, decode_line,
        encode_line, find_item, validate_menu,
    };

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Reads a fixture verbatim.
    fn read_fixture(name: &str) -> String {
        let path = fixtures_dir().join(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        serde_json::from_str(&read_fixture(name))
            .unwrap_or_else(|e| panic!("failed to parse fixture {name}: {e}"))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and compares
    /// the JSON values (order-independent).
    fn roundtrip_test<T>(name: &str)
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  fixture: {fixture}\n  encoded: {reserialized}"
        );
    }

    /// Encodes a host message and compares it against a fixture line.
    fn assert_encodes_to(msg: &HostMessage, name: &str) {
        let line = encode_line(msg).unwrap();
        assert!(line.ends_with('\n'), "{name}: line must end with a newline");
        assert_eq!(
            line.matches('\n').count(),
            1,
            "{name}: line must not embed newlines"
        );

        let encoded: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(encoded, load_fixture(name), "encoding mismatch for {name}");
    }

    /// Decodes a fixture line exactly as the helper would write it.
    fn decode_fixture<M: traybridge_protocol::WireMessage>(name: &str) -> M {
        decode_line(&read_fixture(name))
            .unwrap_or_else(|e| panic!("failed to decode {name}: {e}"))
    }

    // --- Host -> helper ---

    #[test]
    fn fixture_set_icon() {
        let icon = Icon::new(b"png".to_vec(), b"ico".to_vec());
        assert_encodes_to(
            &HostMessage::set_icon(&icon, IconFormat::Png),
            "host_set_icon.json",
        );
    }

    #[test]
    fn fixture_set_tooltip_escapes_newlines() {
        assert_encodes_to(
            &HostMessage::set_tooltip("Syncing \"docs\"\n2 files left"),
            "host_set_tooltip.json",
        );
    }

    #[test]
    fn fixture_quit_has_empty_params() {
        assert_encodes_to(&HostMessage::Quit, "host_quit.json");
    }

    #[test]
    fn fixture_set_menu() {
        let items = vec![
            MenuItem::new("open", "Open"),
            MenuItem::separator(),
            MenuItem::new("quit", "Quit").with_tooltip("Exit the app"),
        ];
        assert_encodes_to(&HostMessage::set_menu(items.clone()), "host_set_menu.json");

        let decoded: HostMessage = decode_fixture("host_set_menu.json");
        assert_eq!(decoded, HostMessage::set_menu(items));
    }

    // --- Helper -> host ---

    #[test]
    fn fixture_ready_without_params() {
        let msg: HelperMessage = decode_fixture("helper_ready.json");
        assert_eq!(msg, HelperMessage::Ready);
    }

    #[test]
    fn fixture_menu_requested() {
        let msg: HelperMessage = decode_fixture("helper_menu_requested.json");
        assert_eq!(msg, HelperMessage::MenuRequested);
    }

    #[test]
    fn fixture_clicked() {
        let msg: HelperMessage = decode_fixture("helper_clicked.json");
        assert_eq!(msg, HelperMessage::clicked("recent:0"));
    }

    #[test]
    fn host_fixtures_are_not_helper_messages() {
        for name in ["host_quit.json", "host_set_icon.json"] {
            assert!(
                decode_line::<HelperMessage>(&read_fixture(name)).is_err(),
                "{name} decoded as a helper message"
            );
        }
    }

    // --- Menu model ---

    #[test]
    fn fixture_menu_tree_roundtrip() {
        roundtrip_test::<Vec<MenuItem>>("menu_tree.json");
    }

    #[test]
    fn fixture_menu_tree_roles() {
        let items: Vec<MenuItem> = serde_json::from_value(load_fixture("menu_tree.json")).unwrap();
        validate_menu(&items).unwrap();

        let roles: Vec<_> = items.iter().map(MenuItem::role).collect();
        assert_eq!(
            roles,
            vec![
                MenuRole::Submenu,
                MenuRole::Leaf,
                MenuRole::Leaf,
                MenuRole::Separator,
                MenuRole::Leaf,
            ]
        );

        let disabled = find_item(&items, "recent:1").unwrap();
        assert!(!disabled.is_enabled());
        assert_eq!(items[1].checked, Some(false));
        assert_eq!(items[4].checked, None);
    }
}
