//! TestFlight operation options

/// Options for notifying testers about a new build
#[derive(Debug, Clone, Copy, Default)]
pub struct NotifyBetaTestersOptions {
    /// Treat "notification already pending" (409) as success
    pub ignore_if_enabled: bool,
}

/// Options for adding a build to an external group
#[derive(Debug, Clone, Copy, Default)]
pub struct AddBuildToExternalGroupOptions {
    /// Notify the group's testers after adding the build
    pub notify_beta_testers: bool,
    pub notify_options: NotifyBetaTestersOptions,

    /// When adding by group name, create the group if it does not exist
    pub create_group_if_missing: bool,
}

/// Options for creating an external beta group
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateGroupOptions {
    /// Always create a new group, even if one with the same name exists
    pub allow_duplicates: bool,
    pub public_link_enabled: bool,
    /// Maximum testers joining through the public link
    pub public_link_limit: Option<u32>,
    pub feedback_enabled: bool,
}
