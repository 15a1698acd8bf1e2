pub mod measurement_panel;
pub mod registry_panel;
pub mod theme;
pub mod toolbar;
pub mod wizard_panel;
