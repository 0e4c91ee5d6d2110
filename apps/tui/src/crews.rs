use crate::domain::Crew;
use crate::store::{Store, CREWS_KEY};
use chrono::Utc;
use thiserror::Error;

/// The placeholder member every new crew starts with.
const DEFAULT_MEMBER: &str = "You";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("crew name must not be empty")]
    EmptyName,
}

/// Ordered in-memory crew list, persisted as a full snapshot after every
/// mutation. Insertion order is display order.
#[derive(Debug)]
pub struct CrewRegistry {
    crews: Vec<Crew>,
    store: Store,
    last_id: i64,
}

impl CrewRegistry {
    pub fn load(store: Store) -> Self {
        let crews: Vec<Crew> = store.load(CREWS_KEY);
        let last_id = crews.iter().map(|crew| crew.id).max().unwrap_or(0);
        Self {
            crews,
            store,
            last_id,
        }
    }

    pub fn crews(&self) -> &[Crew] {
        &self.crews
    }

    pub fn len(&self) -> usize {
        self.crews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crews.is_empty()
    }

    /// Create a crew from user input. A name that is empty after trimming is
    /// rejected without mutation or a persisted write. Store write failures
    /// are logged only; the in-memory mutation already reflects the user's
    /// intent.
    pub fn create_crew(&mut self, name: &str) -> Result<Crew, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let crew = Crew {
            id: self.next_id(),
            name: name.to_string(),
            members: vec![DEFAULT_MEMBER.to_string()],
            cleanup_count: 0,
            trash_collected: 0.0,
            created_at: Utc::now().to_rfc3339(),
        };

        self.crews.push(crew.clone());
        if let Err(e) = self.store.save(CREWS_KEY, &self.crews) {
            eprintln!("store: failed to persist crews: {e}");
        }

        Ok(crew)
    }

    // Timestamp-derived, forced monotonic so rapid creations stay unique.
    fn next_id(&mut self) -> i64 {
        let candidate = Utc::now().timestamp_millis();
        self.last_id = candidate.max(self.last_id + 1);
        self.last_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_registry(name: &str) -> CrewRegistry {
        let path = std::env::temp_dir().join(format!(
            "shoresquad-crews-{name}-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        CrewRegistry::load(Store::open(path))
    }

    fn cleanup(registry: &CrewRegistry) {
        let _ = std::fs::remove_file(registry.store.path());
    }

    #[test]
    fn create_appends_one_record_with_defaults() {
        let mut registry = temp_registry("defaults");

        let crew = registry.create_crew("  Coast Guards  ").unwrap();

        assert_eq!(crew.name, "Coast Guards");
        assert_eq!(crew.members, vec!["You".to_string()]);
        assert_eq!(crew.cleanup_count, 0);
        assert!(crew.trash_collected.abs() < f64::EPSILON);
        assert_eq!(registry.len(), 1);
        cleanup(&registry);
    }

    #[test]
    fn empty_and_whitespace_names_mutate_nothing() {
        let mut registry = temp_registry("rejects");

        assert_eq!(registry.create_crew(""), Err(ValidationError::EmptyName));
        assert_eq!(registry.create_crew("   "), Err(ValidationError::EmptyName));
        assert_eq!(registry.create_crew("\t\n"), Err(ValidationError::EmptyName));

        assert!(registry.is_empty());
        // No write happened either: the store file was never created.
        assert!(!registry.store.path().exists());
        cleanup(&registry);
    }

    #[test]
    fn ids_are_strictly_increasing() {
        let mut registry = temp_registry("ids");

        let a = registry.create_crew("A").unwrap();
        let b = registry.create_crew("B").unwrap();
        let c = registry.create_crew("C").unwrap();

        assert!(a.id < b.id);
        assert!(b.id < c.id);
        cleanup(&registry);
    }

    #[test]
    fn persisted_crews_reload_identically() {
        let mut registry = temp_registry("reload");
        registry.create_crew("Coast Guards").unwrap();
        registry.create_crew("Tide Riders").unwrap();
        registry.create_crew("Beach Rats").unwrap();
        let before = registry.crews().to_vec();

        let reloaded = CrewRegistry::load(registry.store.clone());

        assert_eq!(reloaded.crews(), before.as_slice());
        cleanup(&registry);
    }

    #[test]
    fn reload_continues_id_sequence() {
        let mut registry = temp_registry("id-seq");
        let last = registry.create_crew("First").unwrap();

        let mut reloaded = CrewRegistry::load(registry.store.clone());
        let next = reloaded.create_crew("Second").unwrap();

        assert!(next.id > last.id);
        cleanup(&registry);
    }

    #[test]
    fn corrupted_store_yields_empty_registry() {
        let path = std::env::temp_dir().join(format!(
            "shoresquad-crews-corrupt-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "][").unwrap();

        let registry = CrewRegistry::load(Store::open(path.clone()));

        assert!(registry.is_empty());
        let _ = std::fs::remove_file(path);
    }
}
