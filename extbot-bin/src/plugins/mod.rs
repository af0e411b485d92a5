pub mod utility;

use extbot_core::builders::ExtensionsBuilder;

/// Adds all bundled plugins.
pub fn init(extensions: &mut ExtensionsBuilder) {
    extensions.add(|| utility::Utility);
}
