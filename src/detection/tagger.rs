//! Contextual tagger contract and ownership.
//!
//! The tagger itself lives outside this crate. [`EntityTagger`] is the
//! contract the model adapter consumes, [`CommandTagger`] drives an external
//! process speaking that contract over stdin/stdout, and [`SharedTagger`]
//! owns a tagger instance that is created once and reused across calls.

use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::fmt;
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;

/// One record returned by a token-classification tagger with "simple"
/// aggregation. `start` and `end` are character offsets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaggedEntity {
    pub word: String,
    pub entity_group: String,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub score: Option<f32>,
}

impl TaggedEntity {
    pub fn new(word: &str, entity_group: &str, start: usize, end: usize) -> Self {
        Self {
            word: word.to_string(),
            entity_group: entity_group.to_string(),
            start,
            end,
            score: None,
        }
    }
}

/// Failure while invoking the tagger.
#[derive(Debug, thiserror::Error)]
pub enum TaggerError {
    #[error("failed to start tagger '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("tagger I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("tagger exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("tagger returned malformed output: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("tagger unavailable: {0}")]
    Unavailable(String),
}

/// Given text, returns the entities the tagger recognised in it.
pub trait EntityTagger: Send + Sync {
    fn tag(&self, text: &str) -> Result<Vec<TaggedEntity>, TaggerError>;
}

impl<F> EntityTagger for F
where
    F: Fn(&str) -> Result<Vec<TaggedEntity>, TaggerError> + Send + Sync,
{
    fn tag(&self, text: &str) -> Result<Vec<TaggedEntity>, TaggerError> {
        self(text)
    }
}

/// Runs an external program as the tagger.
///
/// The text is written to the program's stdin; stdout must be a JSON array
/// of [`TaggedEntity`] records.
#[derive(Debug, Clone)]
pub struct CommandTagger {
    program: String,
    args: Vec<String>,
}

impl CommandTagger {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl EntityTagger for CommandTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedEntity>, TaggerError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| TaggerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Feed stdin from a separate thread so a chatty child cannot block
        // on a full stdout pipe while we are still writing.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = text.to_owned();
            std::thread::spawn(move || stdin.write_all(input.as_bytes()))
        });

        let output = child.wait_with_output()?;
        let written = writer.map(|handle| {
            handle
                .join()
                .unwrap_or_else(|_| {
                    Err(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        "stdin writer panicked",
                    ))
                })
        });

        if !output.status.success() {
            return Err(TaggerError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if let Some(Err(err)) = written {
            // A successful tagger may answer without reading all of its input.
            if err.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(TaggerError::Io(err));
            }
            tracing::debug!("Tagger exited before consuming its input");
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

type TaggerInit = Box<dyn Fn() -> Result<Arc<dyn EntityTagger>, TaggerError> + Send + Sync>;

/// Owner of a tagger instance shared by every detection call.
///
/// Initialization happens at most once. A lazily initialized tagger is built
/// on first use; if that fails, the failure is remembered and every later
/// call reports the tagger as unavailable instead of retrying.
pub struct SharedTagger {
    cell: OnceCell<Result<Arc<dyn EntityTagger>, String>>,
    init: Option<TaggerInit>,
}

impl SharedTagger {
    /// Wraps an already constructed tagger.
    pub fn eager(tagger: Arc<dyn EntityTagger>) -> Self {
        Self {
            cell: OnceCell::with_value(Ok(tagger)),
            init: None,
        }
    }

    /// Defers construction until the first call to [`SharedTagger::get`].
    pub fn lazy<F>(init: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn EntityTagger>, TaggerError> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            init: Some(Box::new(init)),
        }
    }

    /// Returns true once initialization has been attempted.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Returns the tagger, initializing it on first use.
    pub fn get(&self) -> Result<&Arc<dyn EntityTagger>, TaggerError> {
        let slot = self.cell.get_or_init(|| {
            let outcome = match &self.init {
                Some(init) => init().map_err(|e| e.to_string()),
                None => Err("no tagger configured".to_string()),
            };
            match &outcome {
                Ok(_) => tracing::info!("Contextual tagger initialized"),
                Err(reason) => tracing::warn!(%reason, "Contextual tagger failed to initialize"),
            }
            outcome
        });
        slot.as_ref()
            .map_err(|reason| TaggerError::Unavailable(reason.clone()))
    }

    /// Invokes the tagger.
    pub fn tag(&self, text: &str) -> Result<Vec<TaggedEntity>, TaggerError> {
        self.get()?.tag(text)
    }
}

impl fmt::Debug for SharedTagger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.cell.get() {
            None => "uninitialized",
            Some(Ok(_)) => "ready",
            Some(Err(_)) => "failed",
        };
        f.debug_struct("SharedTagger").field("state", &state).finish()
    }
}
