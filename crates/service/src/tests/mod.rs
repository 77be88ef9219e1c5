/// Generic Create/Get/List/Delete behaviour
pub mod entity_tests;

/// Cross-entity scenarios and template membership
pub mod catalog_tests;

/// Startup seeding
pub mod seed_tests;
