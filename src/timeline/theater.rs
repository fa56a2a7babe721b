use crate::{
    foundation::error::{StagecraftError, StagecraftResult},
    foundation::events::Emitter,
    performer::Performer,
};

/// Roster changes published by [`Theater`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TheaterEvent {
    /// A performer joined the roster.
    Hired {
        /// Performer id.
        id: String,
    },
    /// A performer left the roster.
    Fired {
        /// Performer id.
        id: String,
    },
}

/// Full roster of performers, in hire order, regardless of visibility.
#[derive(Default)]
pub struct Theater {
    performers: Vec<Box<dyn Performer>>,
    events: Emitter<TheaterEvent>,
}

impl std::fmt::Debug for Theater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Theater")
            .field("performers", &self.ids().collect::<Vec<_>>())
            .finish()
    }
}

impl Theater {
    /// Empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `performer` to the roster and emit [`TheaterEvent::Hired`].
    pub fn hire(&mut self, performer: Box<dyn Performer>) -> StagecraftResult<()> {
        let id = performer.id().to_owned();
        if id.trim().is_empty() {
            return Err(StagecraftError::validation("performer id must be non-empty"));
        }
        if self.get(&id).is_some() {
            return Err(StagecraftError::validation(format!(
                "performer id '{id}' is already hired"
            )));
        }
        self.performers.push(performer);
        self.events.emit(&TheaterEvent::Hired { id });
        Ok(())
    }

    /// Remove the performer with `id`, handing it back to the caller.
    pub fn fire(&mut self, id: &str) -> Option<Box<dyn Performer>> {
        let idx = self.performers.iter().position(|p| p.id() == id)?;
        let performer = self.performers.remove(idx);
        self.events.emit(&TheaterEvent::Fired { id: id.to_owned() });
        Some(performer)
    }

    /// Performers whose half-open window `[start, end)` contains `time_ms`, in hire order.
    pub fn filter_performer_by_time(&self, time_ms: f64) -> Vec<&dyn Performer> {
        self.performers
            .iter()
            .filter(|p| p.start() <= time_ms && time_ms < p.end())
            .map(|p| &**p)
            .collect()
    }

    /// Performer by id.
    pub fn get(&self, id: &str) -> Option<&dyn Performer> {
        self.performers
            .iter()
            .find(|p| p.id() == id)
            .map(|p| &**p)
    }

    /// Mutable performer by id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut (dyn Performer + 'static)> {
        self.performers
            .iter_mut()
            .find(|p| p.id() == id)
            .map(|p| &mut **p)
    }

    /// Performers in hire order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Performer> {
        self.performers.iter().map(|p| &**p)
    }

    /// Mutable performers in hire order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn Performer + 'static)> {
        self.performers.iter_mut().map(|p| &mut **p)
    }

    /// Ids in hire order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.performers.iter().map(|p| p.id())
    }

    /// Latest end over the roster; 0 when empty.
    pub fn max_end(&self) -> f64 {
        self.performers
            .iter()
            .map(|p| p.end())
            .fold(0.0, f64::max)
    }

    /// Roster size.
    pub fn len(&self) -> usize {
        self.performers.len()
    }

    /// True when nobody is hired.
    pub fn is_empty(&self) -> bool {
        self.performers.is_empty()
    }

    /// Event channel.
    pub fn events(&self) -> &Emitter<TheaterEvent> {
        &self.events
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/theater.rs"]
mod tests;
