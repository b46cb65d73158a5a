use crate::post::{Label, PostRecord, PostView, ProfileViewBasic, SelfLabel};

/// Trait for content that has labels attached
///
/// Implemented by types that can be moderated based on their labels.
/// This includes both labels from labeler services and self-labels applied by authors.
pub trait Labeled {
    /// Get the labels applied to this content by labeler services
    fn labels(&self) -> &[Label];

    /// Get self-labels applied by the content author
    fn self_labels(&self) -> Vec<SelfLabel> {
        Vec::new()
    }
}

impl Labeled for PostView {
    fn labels(&self) -> &[Label] {
        self.labels.as_deref().unwrap_or(&[])
    }

    // an undecodable record carries no self labels; the thread plan reports it separately
    fn self_labels(&self) -> Vec<SelfLabel> {
        self.post_record()
            .map(|record| record.self_labels())
            .unwrap_or_default()
    }
}

impl Labeled for ProfileViewBasic {
    fn labels(&self) -> &[Label] {
        self.labels.as_deref().unwrap_or(&[])
    }
}

impl Labeled for PostRecord {
    fn labels(&self) -> &[Label] {
        &[]
    }

    fn self_labels(&self) -> Vec<SelfLabel> {
        self.labels
            .as_ref()
            .map(|labels| labels.values.clone())
            .unwrap_or_default()
    }
}
