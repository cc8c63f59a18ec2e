//! Task id generation.

use crate::model::task::TaskId;
use uuid::Uuid;

/// Produces ids unique within the process lifetime.
pub trait IdGenerator {
    fn next_id(&mut self) -> TaskId;
}

/// Random v4 UUIDs in lowercase hyphenated form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> TaskId {
        Uuid::new_v4().to_string()
    }
}

impl<F: FnMut() -> TaskId> IdGenerator for F {
    fn next_id(&mut self) -> TaskId {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::{IdGenerator, UuidIdGenerator};
    use std::collections::HashSet;

    #[test]
    fn uuid_ids_are_unique_and_hyphenated() {
        let mut ids = UuidIdGenerator;
        let generated: HashSet<String> = (0..256).map(|_| ids.next_id()).collect();
        assert_eq!(generated.len(), 256);
        assert!(generated.iter().all(|id| id.len() == 36 && id.contains('-')));
    }

    #[test]
    fn closures_act_as_generators() {
        let mut counter = 0;
        let mut ids = move || {
            counter += 1;
            format!("t{counter}")
        };
        assert_eq!(ids.next_id(), "t1");
        assert_eq!(ids.next_id(), "t2");
    }
}
