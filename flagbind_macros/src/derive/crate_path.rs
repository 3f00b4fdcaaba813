//! Path used by generated code to reach the runtime crate.
//!
//! Records in crates that rename the `flagbind` dependency set
//! `#[flag(crate = "renamed")]` on the struct.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

/// Runtime path for generated items: the struct override, else `flagbind`.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { flagbind }, ToTokens::to_token_stream)
}
