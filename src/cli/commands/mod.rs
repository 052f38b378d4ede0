pub mod adjustments;
pub mod reports;
pub mod sessions;
pub mod system;
pub mod trainings;

use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let definitions = system::definitions()
        .into_iter()
        .chain(trainings::definitions())
        .chain(sessions::definitions())
        .chain(adjustments::definitions())
        .chain(reports::definitions());
    for entry in definitions {
        registry.register(entry);
    }
}
