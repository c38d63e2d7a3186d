pub const TRAY_MENU_SEARCH: &str = "tray_search";
pub const TRAY_MENU_CONFIGURE: &str = "tray_configure";
pub const TRAY_MENU_QUIT: &str = "tray_quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    Search,
    Configure,
    Quit,
}

/// One entry of the tray menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub shortcut: char,
    pub action: TrayAction,
}

/// The fixed tray menu, in display order.
pub const MENU: [MenuEntry; 3] = [
    MenuEntry {
        id: TRAY_MENU_SEARCH,
        label: "Search",
        shortcut: '1',
        action: TrayAction::Search,
    },
    MenuEntry {
        id: TRAY_MENU_CONFIGURE,
        label: "Configure",
        shortcut: '2',
        action: TrayAction::Configure,
    },
    MenuEntry {
        id: TRAY_MENU_QUIT,
        label: "Quit",
        shortcut: '3',
        action: TrayAction::Quit,
    },
];

pub fn action_from_menu_id(menu_id: &str) -> Option<TrayAction> {
    match menu_id {
        TRAY_MENU_SEARCH => Some(TrayAction::Search),
        TRAY_MENU_CONFIGURE => Some(TrayAction::Configure),
        TRAY_MENU_QUIT => Some(TrayAction::Quit),
        _ => None,
    }
}

/// Map typed console input to a menu action: shortcut, id, label or initial.
pub fn action_from_command(input: &str) -> Option<TrayAction> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Some(action) = action_from_menu_id(input) {
        return Some(action);
    }

    let lowered = input.to_ascii_lowercase();
    MENU.iter()
        .find(|entry| {
            let label = entry.label.to_ascii_lowercase();
            lowered == label
                || lowered == entry.shortcut.to_string()
                || (lowered.len() == 1 && label.starts_with(&lowered))
        })
        .map(|entry| entry.action)
}
