/// Active dialogue cursor. Only present while the phase is `Dialogue`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Conversation {
    pub parcel_id: String,
    pub node_id: String,
    pub choice_index: usize,
}

impl Conversation {
    pub fn new(parcel_id: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self {
            parcel_id: parcel_id.into(),
            node_id: node_id.into(),
            choice_index: 0,
        }
    }
}
