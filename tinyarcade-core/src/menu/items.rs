//! Menu entries and their actions

/// What selecting a menu entry does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuAction {
    /// Run the obstacle game until it exits
    StartGame,
    /// Show a named image for a while, or a not-found notice
    ShowImage(&'static str),
    /// Blank the screen
    ClearScreen,
    /// Say goodbye and stop the application
    Exit,
    /// Entry has no action yet
    Nothing,
}

/// One cell of the menu grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuItem {
    /// Text under the icon
    pub label: &'static str,
    /// Icon asset name
    pub icon: Option<&'static str>,
    pub action: MenuAction,
}

impl MenuItem {
    pub const fn new(label: &'static str, icon: &'static str, action: MenuAction) -> Self {
        Self {
            label,
            icon: Some(icon),
            action,
        }
    }
}

/// Asset shown at startup and by the Image entry
pub const SPLASH_IMAGE: &str = "image.raw";

/// The device's home screen
pub const DEFAULT_ITEMS: [MenuItem; 9] = [
    MenuItem::new("Settings", "setting.raw", MenuAction::Nothing),
    MenuItem::new("Obstacle", "icons/icon_1.raw", MenuAction::StartGame),
    MenuItem::new("Clear", "icons/icon_2.raw", MenuAction::ClearScreen),
    MenuItem::new("Image", "icons/icon_3.raw", MenuAction::ShowImage(SPLASH_IMAGE)),
    MenuItem::new("App5", "icons/icon_4.raw", MenuAction::Nothing),
    MenuItem::new("App6", "icons/icon_5.raw", MenuAction::Nothing),
    MenuItem::new("App7", "icons/icon_6.raw", MenuAction::Nothing),
    MenuItem::new("App8", "icons/icon_7.raw", MenuAction::Nothing),
    MenuItem::new("Exit", "icons/icon_8.raw", MenuAction::Exit),
];
