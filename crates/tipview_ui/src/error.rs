use thiserror::Error;

use crate::view_tree::ViewId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TooltipError {
    #[error(
        "Container {container} is neither a direct nor an indirect parent of reference view {reference}"
    )]
    NotAnAncestor { container: ViewId, reference: ViewId },

    #[error("View {0} is no longer part of the view tree")]
    ViewGone(ViewId),

    #[error("Tooltip is already presented")]
    AlreadyPresented,
}

pub type Result<T> = std::result::Result<T, TooltipError>;
