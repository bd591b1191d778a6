use tracing::debug;

use crate::artifact::Artifact;

#[derive(Debug, Default)]
pub struct ArtifactHost {
    current: Option<Artifact>,
}

impl ArtifactHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, next: Artifact) -> &mut Artifact {
        self.clear();
        self.current.insert(next)
    }

    pub fn clear(&mut self) -> bool {
        match self.current.take() {
            Some(mut artifact) => {
                debug!(kind = artifact.kind_name(), "releasing artifact");
                artifact.teardown();
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<&Artifact> {
        self.current.as_ref()
    }

    #[cfg(test)]
    pub fn is_vacant(&self) -> bool {
        self.current.is_none()
    }
}
