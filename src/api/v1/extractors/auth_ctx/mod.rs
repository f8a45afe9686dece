/*!
 * Authenticated request context
 *
 * - types: AuthCtx (subject id + role)。role guard middleware が extensions に入れる
 * - core: AuthCtxExtractor。guard の掛かっていないルートでは 401
 */

mod core;
mod types;

pub use self::core::AuthCtxExtractor;
pub use self::types::AuthCtx;
