/// What a UI binding renders from: the last payload, whether a call is in
/// flight and the last failure text. Only the coordinator mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error_message: None,
        }
    }
}
