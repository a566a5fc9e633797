//! Caller identity extraction.
//!
//! Copies the raw value of one configured header into an [`Identity`]
//! request extension. The value is never parsed or verified; whatever
//! authenticates callers runs in front of this layer or inside the engine.

use axum::{
    extract::{Request, State},
    http::HeaderName,
    middleware::Next,
    response::Response,
};

use crate::engine::Identity;

pub async fn attach_identity(
    State(header): State<HeaderName>,
    mut request: Request,
    next: Next,
) -> Response {
    // An identity set by an outer authentication layer wins.
    if request.extensions().get::<Identity>().is_none() {
        let identity = request
            .headers()
            .get(&header)
            .and_then(|value| value.to_str().ok())
            .map(Identity::new);
        if let Some(identity) = identity {
            request.extensions_mut().insert(identity);
        }
    }
    next.run(request).await
}
