use thiserror::Error;

/// Result type alias using DeltaXError
pub type Result<T> = std::result::Result<T, DeltaXError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// in the DeltaX system. Each kind maps to a stable error code that can be
/// used for programmatic error handling, testing, and external API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DxErrorKind {
    // Structural/Validation
    InvalidInput,
    NotFound,

    // Diff invariants
    /// Two partition sets claim the same key (partitioner contract breach)
    PartitionOverlap,
    /// A key of either side is missing from every partition set
    PartitionGap,
    /// An ignored property key surfaced in a diff output container
    IgnoredKeyLeaked,
    /// An updated property key has no matching property-change entry
    MissingChangeEntry,
    /// An entity's membership in `updated` disagrees with its property maps
    UpdateCriterionViolated,
    /// `diff()` has not been computed yet where a computed result is required
    NotComputed,

    // Integration/IO (future)
    Io,
    Serialization,

    // Internal
    Internal,
}

impl DxErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            DxErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            DxErrorKind::NotFound => "ERR_NOT_FOUND",
            DxErrorKind::PartitionOverlap => "ERR_PARTITION_OVERLAP",
            DxErrorKind::PartitionGap => "ERR_PARTITION_GAP",
            DxErrorKind::IgnoredKeyLeaked => "ERR_IGNORED_KEY_LEAKED",
            DxErrorKind::MissingChangeEntry => "ERR_MISSING_CHANGE_ENTRY",
            DxErrorKind::UpdateCriterionViolated => "ERR_UPDATE_CRITERION_VIOLATED",
            DxErrorKind::NotComputed => "ERR_NOT_COMPUTED",
            DxErrorKind::Io => "ERR_IO",
            DxErrorKind::Serialization => "ERR_SERIALIZATION",
            DxErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// This error type provides a structured representation of errors with
/// classification fields for programmatic handling and rich context for
/// debugging.
#[derive(Debug, Clone)]
pub struct DxError {
    kind: DxErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    property_id: Option<String>,
    message: String,
    source: Option<Box<DxError>>,
}

impl DxError {
    /// Create a new error with the specified kind
    pub fn new(kind: DxErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            property_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity key context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add property key context
    pub fn with_property_id(mut self, id: impl Into<String>) -> Self {
        self.property_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: DxError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> DxErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity key context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the property key context, if any
    pub fn property_id(&self) -> Option<&str> {
        self.property_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&DxError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for DxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(property_id) = &self.property_id {
            write!(f, " (property_id: {})", property_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for DxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

// ========== End Error Facility ==========

/// Typed error taxonomy for DeltaX operations
///
/// These are the violations the verification surface can report. Entity and
/// property keys are rendered to strings so the taxonomy stays independent of
/// the engine's key type parameter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeltaXError {
    // ===== Partition Errors =====
    /// Two partition sets claim the same key
    #[error("Partition sets overlap on key: {key}")]
    PartitionOverlap { key: String },

    /// A key of either side is covered by no partition set
    #[error("Partition misses key: {key}")]
    PartitionGap { key: String },

    // ===== Result Invariant Errors =====
    /// An ignored property key appeared in a diff output container
    #[error("Ignored property {property_id} leaked into {container} for entity {entity_id}")]
    IgnoredKeyLeaked {
        entity_id: String,
        property_id: String,
        container: &'static str,
    },

    /// An updated property key is absent from the entity's property changes
    #[error("Updated property {property_id} of entity {entity_id} is missing from property changes")]
    MissingChangeEntry {
        entity_id: String,
        property_id: String,
    },

    /// Membership in `updated` disagrees with the entity's property maps
    #[error("Entity {entity_id} violates the update criterion")]
    UpdateCriterionViolated { entity_id: String },

    // ===== Generic Errors =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Conversion from DeltaXError to DxError
///
/// This maps the typed taxonomy onto the canonical error facility so callers
/// can handle both uniformly.
impl From<DeltaXError> for DxError {
    fn from(err: DeltaXError) -> Self {
        match err {
            DeltaXError::PartitionOverlap { key } => DxError::new(DxErrorKind::PartitionOverlap)
                .with_entity_id(key)
                .with_message("Partition sets overlap"),

            DeltaXError::PartitionGap { key } => DxError::new(DxErrorKind::PartitionGap)
                .with_entity_id(key)
                .with_message("Partition misses a key"),

            DeltaXError::IgnoredKeyLeaked {
                entity_id,
                property_id,
                container,
            } => DxError::new(DxErrorKind::IgnoredKeyLeaked)
                .with_entity_id(entity_id)
                .with_property_id(property_id)
                .with_message(format!("Ignored property leaked into {}", container)),

            DeltaXError::MissingChangeEntry {
                entity_id,
                property_id,
            } => DxError::new(DxErrorKind::MissingChangeEntry)
                .with_entity_id(entity_id)
                .with_property_id(property_id)
                .with_message("Updated property missing from property changes"),

            DeltaXError::UpdateCriterionViolated { entity_id } => {
                DxError::new(DxErrorKind::UpdateCriterionViolated)
                    .with_entity_id(entity_id)
                    .with_message("Membership in `updated` disagrees with property maps")
            }

            DeltaXError::Serialization { message } => {
                DxError::new(DxErrorKind::Serialization).with_message(message)
            }

            DeltaXError::Internal { message } => {
                DxError::new(DxErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to DeltaXError
impl From<serde_json::Error> for DeltaXError {
    fn from(err: serde_json::Error) -> Self {
        DeltaXError::Serialization {
            message: err.to_string(),
        }
    }
}
