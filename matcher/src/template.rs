/// A single minutia point in template coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Minutia {
    pub x: u16,
    pub y: u16,
}

/// Decoded fingerprint template.
///
/// Opaque to the enrollment store and the search: they only inspect
/// the feature counts to distinguish a usable template from the empty
/// sentinel. How minutiae and texture features are actually encoded
/// and compared is the [`Matcher`](crate::Matcher)'s business.
///
/// Every `Template` is an independently owned value. Reads from the
/// enrollment store hand out clones, never shared references into the
/// cache.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
    minutiae: Vec<Minutia>,
    textures: Vec<f32>,
}

impl Template {
    pub fn new(minutiae: Vec<Minutia>, textures: Vec<f32>) -> Self {
        Self { minutiae, textures }
    }

    /// The empty sentinel: no minutiae, no texture features.
    ///
    /// Returned by the store for unknown identifiers and undecodable
    /// records. Callers test [`Template::is_empty`] rather than
    /// handling an error.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn minutia_count(&self) -> usize {
        self.minutiae.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// True iff the template carries no features at all.
    pub fn is_empty(&self) -> bool {
        self.minutiae.is_empty() && self.textures.is_empty()
    }

    pub fn minutiae(&self) -> &[Minutia] {
        &self.minutiae
    }

    pub fn textures(&self) -> &[f32] {
        &self.textures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sentinel() {
        let t = Template::empty();
        assert!(t.is_empty());
        assert_eq!(t.minutia_count(), 0);
        assert_eq!(t.texture_count(), 0);
    }

    #[test]
    fn non_empty_with_only_textures() {
        let t = Template::new(vec![], vec![0.5, 0.25]);
        assert!(!t.is_empty());
        assert_eq!(t.minutia_count(), 0);
        assert_eq!(t.texture_count(), 2);
    }
}
