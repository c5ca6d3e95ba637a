extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, Pat};

/// Wraps an async service method in a MongoDB transaction on its
/// `session: &mut Session` argument. The body runs inside the transaction;
/// `Ok` commits, `Err` aborts and is returned unchanged.
#[proc_macro_attribute]
pub fn tx(_args: TokenStream, input: TokenStream) -> TokenStream {
    let source_fn = parse_macro_input!(input as ItemFn);

    let mut inner_fn = source_fn.clone();
    let inner_name = quote::format_ident!("__tx_{}", source_fn.sig.ident);
    inner_fn.sig.ident = inner_name.clone();
    inner_fn.vis = syn::Visibility::Inherited;

    let mut forwarded = Vec::new();
    for arg in &source_fn.sig.inputs {
        match arg {
            FnArg::Receiver(_) => forwarded.push(quote!(self)),
            FnArg::Typed(typed) => {
                if let Pat::Ident(ident) = typed.pat.as_ref() {
                    let name = &ident.ident;
                    forwarded.push(quote!(#name));
                } else {
                    return syn::Error::new_spanned(typed, "unsupported argument pattern in #[tx]")
                        .to_compile_error()
                        .into();
                }
            }
        }
    }

    let vis = &source_fn.vis;
    let sig = &source_fn.sig;
    let gen = quote! {
        #inner_fn

        #vis #sig {
            session.start_transaction().await?;
            match Self::#inner_name(#(#forwarded),*).await {
                Ok(result) => {
                    session.commit_transaction().await?;
                    Ok(result)
                }
                Err(err) => {
                    session.abort_transaction().await?;
                    Err(err)
                }
            }
        }
    };

    TokenStream::from(gen)
}
