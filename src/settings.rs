/// Defines interaction behaviour of the widget.
///
/// Dragging and selection imply the settings they depend on; e.g. enabling
/// `dragging_enabled` also enables hover and node clicking for the frame.
#[derive(Debug, Clone, Default)]
pub struct SettingsInteraction {
    /// Node dragging; dropping a dragged node onto a sibling re-orders them.
    pub dragging_enabled: bool,

    /// Node hover highlighting
    pub hover_enabled: bool,

    /// Allows clicking on nodes
    pub node_clicking_enabled: bool,

    /// Selects single clicked node, enables clicking
    pub node_selection_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct SettingsNavigation {
    /// Fit tree to the screen
    pub fit_to_screen_enabled: bool,

    /// Zoom and pan
    pub zoom_and_pan_enabled: bool,

    /// Padding around the tree when fitting to screen
    pub fit_to_screen_padding: f32,

    /// Zoom step
    pub zoom_speed: f32,
}

impl Default for SettingsNavigation {
    fn default() -> Self {
        Self {
            fit_to_screen_enabled: true,
            zoom_and_pan_enabled: false,
            fit_to_screen_padding: 0.3,
            zoom_speed: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStyle {
    /// Labels of all nodes; otherwise only interacted nodes show theirs
    pub labels_always: bool,

    /// Stroke width of parent-child connections, canvas units
    pub connection_width: f32,
}

impl Default for SettingsStyle {
    fn default() -> Self {
        Self {
            labels_always: false,
            connection_width: 1.0,
        }
    }
}
