//! The signature source: per-type candidate sets, cached.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::hint::{ElementHint, TypeHinter};
use crate::token::{ContainerKind, Token, TokenError};

use super::matcher::SignatureMatcher;
use super::schema::RecordSchema;
use super::{
    ConstructorSignature, FieldSignature, MapSignature, SequenceSignature, SignatureError,
    SignatureRef, Strategy,
};

/// Yields (building on demand) the signature matcher for any target type.
///
/// Resolution order for an uncached type: registered custom signatures
/// first; otherwise dispatch on the type's classification: sequences and
/// maps get their container signature, records get a signature derived
/// from their registered schema by the selected strategy. Scalars never
/// reach the matcher; the processor converts them inline.
///
/// The source is constructed once by the mapper builder and shared; after
/// that it is read-mostly. The matcher cache takes a write lock only on a
/// miss, and racing misses may build the same matcher twice, which is
/// side-effect-free.
pub struct SignatureSource {
    hinter: TypeHinter,
    default_strategy: Strategy,
    schemas: HashMap<Token, Arc<RecordSchema>>,
    custom: HashMap<Token, Vec<SignatureRef>>,
    cache: RwLock<HashMap<Token, Arc<SignatureMatcher>>>,
}

impl SignatureSource {
    pub(crate) fn new(
        hinter: TypeHinter,
        default_strategy: Strategy,
        schemas: HashMap<Token, Arc<RecordSchema>>,
        custom: HashMap<Token, Vec<SignatureRef>>,
    ) -> Self {
        Self {
            hinter,
            default_strategy,
            schemas,
            custom,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The matcher for `target`, from cache or freshly built
    pub fn matcher_for(&self, target: &Token) -> Result<Arc<SignatureMatcher>, SignatureError> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(matcher) = cache.get(target) {
                return Ok(matcher.clone());
            }
        }

        debug!(ty = target.name(), "building signature matcher");
        let built = Arc::new(self.build_matcher(target)?);

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(cache.entry(target.clone()).or_insert(built).clone())
    }

    fn build_matcher(&self, target: &Token) -> Result<SignatureMatcher, SignatureError> {
        if let Some(customs) = self.custom.get(target) {
            return Ok(SignatureMatcher::new(customs.clone(), self.hinter.clone()));
        }

        let signatures: Vec<SignatureRef> = match self.hinter.classify(target) {
            ElementHint::List => {
                vec![Arc::new(SequenceSignature::from_token(target)?)]
            }
            ElementHint::Node => {
                if target.container_kind() == Some(ContainerKind::Map) {
                    vec![Arc::new(MapSignature::from_token(target)?)]
                } else {
                    let Some(schema) = self.schemas.get(target) else {
                        return Err(TokenError::TypeUnavailable {
                            name: target.name().to_string(),
                        }
                        .into());
                    };
                    match self.select_strategy(schema) {
                        Strategy::Constructor => {
                            vec![Arc::new(ConstructorSignature::from_schema(schema)?)]
                        }
                        Strategy::Field => {
                            vec![Arc::new(FieldSignature::from_schema(schema)?)]
                        }
                    }
                }
            }
            // Scalars are converted inline by the processor; an empty
            // candidate set makes any stray request fail as unmatched.
            ElementHint::Scalar => Vec::new(),
        };

        Ok(SignatureMatcher::new(signatures, self.hinter.clone()))
    }

    // The signature builder selector: an explicit strategy hint on the
    // schema wins, the mapper-wide default applies otherwise.
    fn select_strategy(&self, schema: &RecordSchema) -> Strategy {
        schema.strategy().unwrap_or(self.default_strategy)
    }

    /// The hinter this source classifies with
    pub fn hinter(&self) -> &TypeHinter {
        &self.hinter
    }
}
