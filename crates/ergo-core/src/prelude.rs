pub use crate::ergo::{
    ErgoState, IntoStateAction, StateAction, StateValue, use_ergo_state, use_ergo_state_value,
    use_optional_ergo_state,
};
pub use crate::runtime::{
    ComposeGuard, InstanceFlags, InstanceId, Scheduler, SchedulerConfig, current_instance,
    remember, remember_with_key,
};
pub use crate::semantics::{Role, Semantics};
pub use crate::state::{Setter, use_memo, use_state};
pub use crate::view::{Callback, View, ViewKind};
pub use crate::widgets::{Button, Fragment, Text};
