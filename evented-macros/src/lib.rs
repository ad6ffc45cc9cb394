//! Procedural macros for the evented dispatch library.
//!
//! - `#[derive(Event)]`: Implements `evented::Event` for a struct holding an
//!   `EventState<Self>`, preserving generics and bounds. The state field is
//!   the one marked `#[event]`, or else the only field whose type is named
//!   `EventState`.
//!
//! Usage:
//! ```rust,ignore
//! use evented::{Event, EventState};
//!
//! #[derive(Event)]
//! struct KeyPressed {
//!     #[event]
//!     state: EventState<KeyPressed>,
//!     key: char,
//! }
//!
//! // Tuple structs work too
//! #[derive(Event)]
//! struct Tick(EventState<Tick>, u64);
//! ```
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Error, Field, Fields, Index, Member, Type, parse_macro_input};

#[proc_macro_derive(Event, attributes(event))]
pub fn derive_event(input: TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_event(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

fn expand_event(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(Error::new(
                Span::call_site(),
                "#[derive(Event)] is only supported on structs",
            ));
        }
    };

    let member = state_member(fields)?;

    Ok(quote! {
        impl #impl_generics ::evented::Event for #ident #ty_generics #where_clause {
            fn state(&self) -> &::evented::EventState<Self> {
                &self.#member
            }

            fn state_mut(&mut self) -> &mut ::evented::EventState<Self> {
                &mut self.#member
            }
        }
    })
}

fn state_member(fields: &Fields) -> syn::Result<Member> {
    let indexed: Vec<(usize, &Field)> = fields.iter().enumerate().collect();

    let marked: Vec<_> = indexed
        .iter()
        .filter(|(_, f)| f.attrs.iter().any(|a| a.path().is_ident("event")))
        .collect();

    let chosen = match marked.as_slice() {
        [one] => **one,
        [] => {
            let by_type: Vec<_> = indexed.iter().filter(|(_, f)| is_event_state(&f.ty)).collect();
            match by_type.as_slice() {
                [one] => **one,
                [] => {
                    return Err(Error::new(
                        Span::call_site(),
                        "#[derive(Event)] needs a field of type `EventState<Self>`",
                    ));
                }
                _ => {
                    return Err(Error::new(
                        Span::call_site(),
                        "several `EventState` fields found; mark one with #[event]",
                    ));
                }
            }
        }
        _ => {
            return Err(Error::new(
                Span::call_site(),
                "only one field may be marked with #[event]",
            ));
        }
    };

    let (idx, field) = chosen;
    Ok(match &field.ident {
        Some(name) => Member::Named(name.clone()),
        None => Member::Unnamed(Index::from(idx)),
    })
}

fn is_event_state(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|seg| seg.ident == "EventState"),
        _ => false,
    }
}
