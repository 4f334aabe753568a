//! # Kata Derive
//!
//! The `suite!` macro: a block-structured DSL that expands to calls on
//! `kata::Suite`.
//!
//! ```rust,ignore
//! let suite = kata::suite! {
//!     describe "calc" {
//!         before_each |scope| { scope.insert(Calc::default()); }
//!
//!         it "adds" |scope| {
//!             check_eq!(scope.get::<Calc>().unwrap().add(1, 1), 2);
//!         }
//!
//!         pending "divides";
//!     }
//! };
//! ```
//!
//! Every group and example records the file it was written in, the line of
//! its keyword and the line of its closing brace, so a line filter can pick
//! an example by any line of its body.
//!
//! This macro is re-exported by the main `kata` crate,
//! so users typically don't need to import this crate directly.

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2, TokenTree};
use quote::{quote, quote_spanned, ToTokens};
use syn::{
    braced,
    parse::{Parse, ParseStream},
    parse_macro_input, token, Ident, LitStr, Token,
};

/// Everything between the braces of `suite! { ... }`.
struct Suite {
    items: Vec<Item>,
}

enum Item {
    /// `describe "..." { items }` or `context "..." { items }`.
    Group {
        keyword: Ident,
        description: LitStr,
        close: Span,
        items: Vec<Item>,
    },
    /// `it "..." |scope| { body }`.
    Example {
        keyword: Ident,
        description: LitStr,
        param: Option<TokenStream2>,
        body: TokenStream2,
        close: Span,
    },
    /// `pending "...";` or `pending "..." { body }`.
    Pending {
        keyword: Ident,
        description: LitStr,
        param: Option<TokenStream2>,
        body: Option<(TokenStream2, Span)>,
    },
    /// `before_each |scope| { body }` or `after_each |scope| { body }`.
    Hook {
        keyword: Ident,
        param: Option<TokenStream2>,
        body: TokenStream2,
    },
}

impl Parse for Suite {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        Ok(Suite {
            items: parse_items(input)?,
        })
    }
}

impl Parse for Item {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let keyword: Ident = input.parse()?;
        let item = match keyword.to_string().as_str() {
            "describe" | "context" => {
                let description = input.parse()?;
                let content;
                let brace = braced!(content in input);
                Item::Group {
                    keyword,
                    description,
                    close: brace.span.close(),
                    items: parse_items(&content)?,
                }
            }
            "it" => {
                let description = input.parse()?;
                let param = parse_param(input)?;
                let (body, close) = parse_body(input)?;
                Item::Example {
                    keyword,
                    description,
                    param,
                    body,
                    close,
                }
            }
            "pending" => {
                let description = input.parse()?;
                let param = parse_param(input)?;
                let body = if input.peek(token::Brace) {
                    Some(parse_body(input)?)
                } else {
                    None
                };
                Item::Pending {
                    keyword,
                    description,
                    param,
                    body,
                }
            }
            "before_each" | "after_each" => {
                let param = parse_param(input)?;
                let (body, _) = parse_body(input)?;
                Item::Hook {
                    keyword,
                    param,
                    body,
                }
            }
            other => {
                return Err(syn::Error::new(
                    keyword.span(),
                    format!(
                        "expected `describe`, `context`, `it`, `pending`, `before_each` or `after_each`, found `{other}`"
                    ),
                ))
            }
        };

        if input.peek(Token![;]) {
            input.parse::<Token![;]>()?;
        }
        Ok(item)
    }
}

fn parse_items(input: ParseStream) -> syn::Result<Vec<Item>> {
    let mut items = Vec::new();
    while !input.is_empty() {
        items.push(input.parse()?);
    }
    Ok(items)
}

/// Parses an optional `|name|` or `|_|` binding for the scope.
fn parse_param(input: ParseStream) -> syn::Result<Option<TokenStream2>> {
    if !input.peek(Token![|]) {
        return Ok(None);
    }
    input.parse::<Token![|]>()?;
    let param = if input.peek(Token![_]) {
        input.parse::<Token![_]>()?.into_token_stream()
    } else {
        input.parse::<Ident>()?.into_token_stream()
    };
    input.parse::<Token![|]>()?;
    Ok(Some(param))
}

/// Parses a braced body as raw tokens and returns them with the span of the
/// closing brace.
fn parse_body(input: ParseStream) -> syn::Result<(TokenStream2, Span)> {
    let content;
    let brace = braced!(content in input);
    let body: TokenStream2 = content.parse()?;
    if let Some(span) = find_nested_registration(body.clone()) {
        return Err(syn::Error::new(
            span,
            "cannot nest an example inside an example",
        ));
    }
    Ok((body, brace.span.close()))
}

/// Finds DSL registrations (`it "..."`, `describe "..."`, `suite!`, ...)
/// written inside an example or hook body.
fn find_nested_registration(tokens: TokenStream2) -> Option<Span> {
    let mut iter = tokens.into_iter().peekable();
    while let Some(tree) = iter.next() {
        match &tree {
            TokenTree::Group(group) => {
                if let Some(span) = find_nested_registration(group.stream()) {
                    return Some(span);
                }
            }
            TokenTree::Ident(ident) => {
                let nested = match (ident.to_string().as_str(), iter.peek()) {
                    ("describe" | "context" | "it" | "pending", Some(TokenTree::Literal(lit))) => {
                        let lit = lit.to_string();
                        lit.starts_with('"') || lit.starts_with("r\"") || lit.starts_with("r#")
                    }
                    ("suite", Some(TokenTree::Punct(punct))) => {
                        punct.as_char() == '!' && punct.spacing() == proc_macro2::Spacing::Alone
                    }
                    _ => false,
                };
                if nested {
                    return Some(ident.span());
                }
            }
            _ => {}
        }
    }
    None
}

fn suite_ident() -> Ident {
    Ident::new("__kata_suite", Span::call_site())
}

/// `kata::Location` spanning the line of `start` to the line of `end`.
///
/// `line!()` and `file!()` take the position of the tokens they are spanned
/// with, which here are tokens of the macro input.
fn location(start: Span, end: Span) -> TokenStream2 {
    let file = quote_spanned!(start=> ::core::file!());
    let line = quote_spanned!(start=> ::core::line!());
    let end_line = quote_spanned!(end=> ::core::line!());
    quote!(::kata::Location::new(#file, #line, #end_line))
}

/// A body or hook as a `'static` closure over `&mut kata::Scope`.
///
/// The block must evaluate to `()`; it leaves early through `?`, `return`,
/// `fail!` or a failing check.
fn closure(param: &Option<TokenStream2>, body: &TokenStream2) -> TokenStream2 {
    let param = param.clone().unwrap_or_else(|| quote!(_));
    quote! {
        move |#param: &mut ::kata::Scope| -> ::kata::eyre::Result<()> {
            #[allow(unreachable_code)]
            let __kata_outcome: ::kata::eyre::Result<()> = {
                { #body }
                ::std::result::Result::Ok(())
            };
            __kata_outcome
        }
    }
}

impl Item {
    fn expand(&self) -> TokenStream2 {
        let suite = suite_ident();
        match self {
            Item::Group {
                keyword,
                description,
                close,
                items,
            } => {
                let location = location(keyword.span(), *close);
                let items = items.iter().map(Item::expand);
                quote! {
                    #suite.#keyword(#description, #location, |#suite| {
                        #(#items)*
                    });
                }
            }
            Item::Example {
                keyword,
                description,
                param,
                body,
                close,
            } => {
                let location = location(keyword.span(), *close);
                let body = closure(param, body);
                quote! {
                    #suite.#keyword(#description, #location, #body);
                }
            }
            Item::Pending {
                keyword,
                description,
                param,
                body,
            } => match body {
                Some((body, close)) => {
                    let location = location(keyword.span(), *close);
                    let body = closure(param, body);
                    quote! {
                        #suite.pending_with(#description, #location, #body);
                    }
                }
                None => {
                    let location = location(keyword.span(), keyword.span());
                    quote! {
                        #suite.#keyword(#description, #location);
                    }
                }
            },
            Item::Hook {
                keyword,
                param,
                body,
            } => {
                let body = closure(param, body);
                quote! {
                    #suite.#keyword(#body);
                }
            }
        }
    }
}

impl Suite {
    fn expand(&self) -> TokenStream2 {
        let suite = suite_ident();
        let items = self.items.iter().map(Item::expand);
        quote! {
            {
                let mut #suite = ::kata::Suite::new();
                #(#items)*
                #suite
            }
        }
    }
}

/// Builds a `kata::Suite` from `describe`/`context` groups, `it` and
/// `pending` examples and `before_each`/`after_each` hooks.
///
/// # Grammar
///
/// ```text
/// item    := group | example | pending | hook
/// group   := ("describe" | "context") STRING "{" item* "}"
/// example := "it" STRING param? "{" body "}"
/// pending := "pending" STRING param? ("{" body "}")? ";"?
/// hook    := ("before_each" | "after_each") param? "{" body "}"
/// param   := "|" (IDENT | "_") "|"
/// ```
///
/// Bodies are ordinary Rust blocks evaluating to `()`. They become `move`
/// closures, so values they use must be owned or `'static`. `?`, `fail!` and
/// the `check*!` macros end the example early.
///
/// Writing an example or group inside an example or hook body is rejected at
/// compile time.
///
/// # Examples
///
/// ```rust,ignore
/// let mut suite = kata::suite! {
///     describe "stack" {
///         it "starts empty" {
///             check!(Vec::<u8>::new().is_empty());
///         }
///
///         context "with one element" {
///             before_each |scope| { scope.insert(vec![1]); }
///
///             it "pops it" |scope| {
///                 let stack = scope.get_mut::<Vec<i32>>().unwrap();
///                 check_eq!(stack.pop(), Some(1));
///             }
///         }
///     }
/// };
/// ```
#[proc_macro]
pub fn suite(input: TokenStream) -> TokenStream {
    let suite = parse_macro_input!(input as Suite);
    suite.expand().into()
}
