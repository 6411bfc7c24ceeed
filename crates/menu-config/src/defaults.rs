// Built-in mode configuration used when no file is supplied.

use crate::{
    Customization, DEFAULT_MENU_NAME, Error, MenuBundle, ModeConfig, loader::load_from_str,
};

/// Default customizations: a right click opens `viewerContextMenu`, which
/// offers measurement actions when an annotation is under the pointer.
pub const BUILTIN_RON: &str = r#"(
    customizations: {
        "showContextMenu": commands(commands: [
            (
                command_name: "showViewerContextMenu",
                command_options: {"menuName": "viewerContextMenu"},
                context: "VIEWER",
            ),
        ]),
        "viewerContextMenu": context_menu(
            menus: [
                (
                    id: "forExistingMeasurement",
                    selector: present("nearbyToolData"),
                    items: [
                        (id: "delete", label: "Delete measurement", command_name: "deleteMeasurement"),
                        (id: "label", label: "Add Label", command_name: "setLabel"),
                        (id: "findings", label: "Add Finding", action_type: sub_menu, sub_menu: "findingsMenu"),
                        (id: "sites", label: "Add Site", action_type: sub_menu, sub_menu: "siteMenu"),
                    ],
                ),
                (
                    id: "findingsMenu",
                    selector: never,
                    attribute: "code",
                    items: [
                        (id: "finding-abnormal", command_name: "setFinding", attrs: {"code": "Abnormal"}),
                        (id: "finding-normal", command_name: "setFinding", attrs: {"code": "Normal"}),
                        (id: "finding-lesion", command_name: "setFinding", attrs: {"code": "Lesion"}),
                    ],
                ),
                (
                    id: "siteMenu",
                    selector: never,
                    attribute: "code",
                    items: [
                        (id: "site-anterior", command_name: "setSite", attrs: {"code": "Anterior"}),
                        (id: "site-posterior", command_name: "setSite", attrs: {"code": "Posterior"}),
                    ],
                ),
            ],
            refs: {
                "Abnormal": (text: "Abnormal", attrs: {"scheme": "SCT", "value": "263654008"}),
                "Normal": (text: "Normal", attrs: {"scheme": "SCT", "value": "17621005"}),
                "Lesion": (text: "Lesion", attrs: {"scheme": "SCT", "value": "52988006"}),
                "Anterior": (text: "Anterior", attrs: {"scheme": "SCT", "value": "255549009"}),
                "Posterior": (text: "Posterior", attrs: {"scheme": "SCT", "value": "255551008"}),
            },
        ),
    },
)"#;

impl ModeConfig {
    /// Parse the built-in configuration.
    pub fn builtin() -> Result<Self, Error> {
        load_from_str(BUILTIN_RON, None)
    }
}

impl MenuBundle {
    /// The built-in `viewerContextMenu` bundle, used when a mode names a menu
    /// customization it does not define.
    pub fn builtin() -> Result<Self, Error> {
        ModeConfig::builtin()?
            .get(DEFAULT_MENU_NAME)
            .and_then(Customization::as_menus)
            .cloned()
            .ok_or_else(|| Error::Validation {
                path: None,
                message: format!("built-in configuration lacks '{DEFAULT_MENU_NAME}'"),
            })
    }
}
