//! Browser teardown at the end of a sweep

use chromiumoxide::Browser;
use log::{debug, warn};
use std::path::Path;

/// Result of cleanup operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupResult {
    /// All cleanup operations succeeded
    Success,
    /// Some cleanup operations failed, with error details
    PartialFailure(Vec<String>),
}

impl CleanupResult {
    fn from_errors(errors: Vec<String>) -> Self {
        if errors.is_empty() {
            Self::Success
        } else {
            Self::PartialFailure(errors)
        }
    }
}

/// Close the browser, wait for its process, then remove its profile directory
///
/// Every step is attempted even if an earlier one failed.
pub async fn close_browser_session(mut browser: Browser, user_data_dir: &Path) -> CleanupResult {
    let mut errors = Vec::new();

    debug!(target: "fpo_contact_scrape::cleanup", "Closing browser");
    if let Err(e) = browser.close().await {
        warn!(target: "fpo_contact_scrape::cleanup", "Failed to close browser: {e}");
        errors.push(format!("Browser close failed: {e}"));
    }

    // Reap the child so it does not outlive the sweep
    if let Err(e) = browser.wait().await {
        warn!(target: "fpo_contact_scrape::cleanup", "Failed to wait for browser exit: {e}");
        errors.push(format!("Browser wait failed: {e}"));
    }

    errors.extend(remove_profile_dir(user_data_dir));

    CleanupResult::from_errors(errors)
}

/// Remove a browser profile directory; a directory that is already gone is fine
pub fn remove_profile_dir(user_data_dir: &Path) -> Option<String> {
    match std::fs::remove_dir_all(user_data_dir) {
        Ok(()) => {
            debug!(target: "fpo_contact_scrape::cleanup", "Removed {}", user_data_dir.display());
            None
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!(
                target: "fpo_contact_scrape::cleanup",
                "Failed to remove browser profile {}: {e}",
                user_data_dir.display()
            );
            Some(format!("Directory cleanup failed: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_profile_dir() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join("profile");
        std::fs::create_dir_all(profile.join("Default")).unwrap();
        std::fs::write(profile.join("Default").join("Preferences"), "{}").unwrap();

        assert_eq!(remove_profile_dir(&profile), None);
        assert!(!profile.exists());
        // Second removal is a no-op
        assert_eq!(remove_profile_dir(&profile), None);
    }

    #[test]
    fn test_cleanup_result_from_errors() {
        assert_eq!(CleanupResult::from_errors(Vec::new()), CleanupResult::Success);
        assert_eq!(
            CleanupResult::from_errors(vec!["x".into()]),
            CleanupResult::PartialFailure(vec!["x".into()])
        );
    }
}
