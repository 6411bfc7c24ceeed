#[cfg(test)]
mod tests {
    use std::{
        env, fs,
        path::{Path, PathBuf},
        process,
        time::{SystemTime, UNIX_EPOCH},
    };

    use serde_json::json;

    use crate::*;

    #[test]
    fn builtin_config_parses() {
        let cfg = ModeConfig::builtin().unwrap();
        let show = cfg.get(SHOW_CONTEXT_MENU).and_then(Customization::as_commands);
        assert_eq!(
            show,
            Some(&CommandCustomization::show_context_menu_default())
        );
        let bundle = cfg
            .get(DEFAULT_MENU_NAME)
            .and_then(Customization::as_menus)
            .unwrap();
        assert_eq!(bundle.menus.len(), 3);
        assert_eq!(bundle.refs.get("Lesion").map(|e| e.text.as_str()), Some("Lesion"));
    }

    #[test]
    fn optional_fields_accept_bare_values() {
        let ron = r#"(
            customizations: {
                "m": context_menu(menus: [
                    (
                        id: "root",
                        selector: eq("toolName", "Length"),
                        attribute: "code",
                        items: [
                            (id: "a", label: "A", check: present("value"), command_name: "cmdA",
                             command_options: {"n": 1}, context: "VIEWER"),
                            (id: "b", delegating: true, sub_menu: "child"),
                        ],
                    ),
                    (id: "child", items: [(id: "c", label: "C")]),
                ]),
            },
        )"#;
        let cfg = load_from_str(ron, None).unwrap();
        let bundle = cfg.get("m").and_then(Customization::as_menus).unwrap();
        let root = bundle.menus.get("root").unwrap();
        assert_eq!(root.attribute.as_deref(), Some("code"));
        assert_eq!(
            root.selector,
            Some(Predicate::Eq("toolName".into(), json!("Length")))
        );
        let a = &root.items[0];
        assert_eq!(a.label.as_deref(), Some("A"));
        assert_eq!(a.command_name.as_deref(), Some("cmdA"));
        assert_eq!(a.command_options.get("n"), Some(&json!(1)));
        assert_eq!(a.context.as_deref(), Some("VIEWER"));
        assert_eq!(a.action_type, ActionKind::Default);
        assert!(root.items[1].delegating);
        assert_eq!(root.delegates().collect::<Vec<_>>(), vec!["child"]);
    }

    #[test]
    fn unknown_item_field_fails() {
        // misspelled command_name => comand_name should error
        let ron = r#"(
            customizations: {
                "m": context_menu(menus: [(id: "root", items: [(id: "a", comand_name: "x")])]),
            },
        )"#;
        let err = load_from_str(ron, Some(Path::new("mode.ron"))).unwrap_err();
        match err {
            Error::Parse { path, line, .. } => {
                assert_eq!(path.as_deref(), Some(Path::new("mode.ron")));
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn unique_tmp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        let mut dir = env::temp_dir();
        dir.push(format!("ctxmenu-{name}-{}-{nanos}", process::id()));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn builtin_menu_bundle_is_viewer_menu() {
        let bundle = MenuBundle::builtin().unwrap();
        assert!(bundle.menus.get("forExistingMeasurement").is_some());
        assert!(bundle.refs.get("Abnormal").is_some());
    }

    #[test]
    fn cyclic_file_reports_its_path() {
        let path = unique_tmp_dir("cyclic").join("mode.ron");
        fs::write(
            &path,
            r#"(
                customizations: {
                    "m": context_menu(menus: [
                        (id: "a", items: [(id: "x", delegating: true, sub_menu: "a")]),
                    ]),
                },
            )"#,
        )
        .expect("write config");
        let err = load_from_path(&path).unwrap_err();
        match &err {
            Error::Validation { path: Some(p), message } => {
                assert_eq!(p, &path);
                assert_eq!(message, "Cyclic menu definition: a -> a");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.pretty().contains(&path.display().to_string()));
    }

    #[test]
    fn cyclic_menus_fail_at_load() {
        let ron = r#"(
            customizations: {
                "m": context_menu(menus: [
                    (id: "a", items: [(id: "x", delegating: true, sub_menu: "b")]),
                    (id: "b", items: [(id: "y", delegating: true, sub_menu: "a")]),
                ]),
            },
        )"#;
        let err = load_from_str(ron, None).unwrap_err();
        assert_eq!(
            err,
            Error::CyclicMenuDefinition {
                cycle: vec!["a".into(), "b".into(), "a".into()]
            }
        );
    }

    #[test]
    fn run_commands_items_parse() {
        let ron = r#"(
            customizations: {
                "m": context_menu(menus: [(id: "a", items: [
                    (id: "both", label: "Both", action_type: run_commands, commands: [
                        (command_name: "first"),
                        (command_name: "second", command_options: {"k": "v"}, context: "VIEWER"),
                    ]),
                ])]),
            },
        )"#;
        let cfg = load_from_str(ron, None).unwrap();
        let item = &cfg
            .get("m")
            .and_then(Customization::as_menus)
            .and_then(|b| b.menus.get("a"))
            .unwrap()
            .items[0];
        assert_eq!(item.action_type, ActionKind::RunCommands);
        assert_eq!(item.commands.len(), 2);
        assert_eq!(
            item.commands[1],
            CommandSpec::new("second")
                .with_option("k", json!("v"))
                .with_context("VIEWER")
        );
    }

    #[test]
    fn non_ron_path_is_rejected() {
        let err = load_from_path(Path::new("mode.toml")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
