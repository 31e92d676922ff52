use crate::morphs::morph::*;

use itertools::Itertools;

macro_const! {
    const DOC: &str = r#"
Ordered sequence of morphs sharing one configuration context

Applying the chain threads the curve pair through every element in order,
handing each one the shared configuration. The chain's own input accessors
delegate to the first element and its output accessors to the last; an
empty chain is a valid no-op.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Debug, Default)]
pub struct MorphChain {
    config: MorphConfig,
    morphs: Vec<Morph>,
}

impl MorphChain {
    pub fn new(config: MorphConfig) -> Self {
        Self {
            config,
            morphs: Vec::new(),
        }
    }

    pub fn with_morphs(config: MorphConfig, morphs: impl Into<Vec<Morph>>) -> Self {
        Self {
            config,
            morphs: morphs.into(),
        }
    }

    pub const fn doc() -> &'static str {
        DOC
    }

    pub fn push(&mut self, morph: impl Into<Morph>) {
        self.morphs.push(morph.into());
    }

    /// Swap out the element at `index`, returning the old one.
    ///
    /// Replacing an element with [MorphIdentity] disables its effect without
    /// disturbing the rest of the chain, e.g. to undo grid resampling before
    /// reporting final curves.
    pub fn replace(&mut self, index: usize, morph: impl Into<Morph>) -> Morph {
        std::mem::replace(&mut self.morphs[index], morph.into())
    }

    pub fn len(&self) -> usize {
        self.morphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.morphs.is_empty()
    }

    pub fn morphs(&self) -> &[Morph] {
        &self.morphs
    }

    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut MorphConfig {
        &mut self.config
    }

    pub fn into_config(self) -> MorphConfig {
        self.config
    }

    /// Parameter names declared by the elements, deduplicated in chain order.
    pub fn par_names(&self) -> Vec<&'static str> {
        self.morphs
            .iter()
            .flat_map(|morph| morph.par_names().iter().copied())
            .unique()
            .collect()
    }

    /// Apply every element in order, threading the curve pair through.
    pub fn apply(
        &mut self,
        morph: &Curve,
        target: &Curve,
    ) -> Result<(Curve, Curve), MorphError> {
        let mut pair = (morph.clone(), target.clone());
        for element in &mut self.morphs {
            pair = element.morph(&mut self.config, &pair.0, &pair.1)?;
        }
        Ok(pair)
    }

    pub fn xy_morph_in(&self) -> Option<&Curve> {
        self.morphs.first().and_then(MorphTrait::xy_morph_in)
    }

    pub fn xy_target_in(&self) -> Option<&Curve> {
        self.morphs.first().and_then(MorphTrait::xy_target_in)
    }

    pub fn xy_morph_out(&self) -> Option<&Curve> {
        self.morphs.last().and_then(MorphTrait::xy_morph_out)
    }

    pub fn xy_target_out(&self) -> Option<&Curve> {
        self.morphs.last().and_then(MorphTrait::xy_target_out)
    }

    /// Output curves of the last element, `None` for an empty or unapplied
    /// chain.
    pub fn xyallout(&self) -> Option<(&Curve, &Curve)> {
        self.morphs.last().and_then(MorphTrait::xyallout)
    }
}
