use proc_macro2::{Delimiter, Group, Spacing, TokenStream, TokenTree};
use quote::quote;

/// Rewrites `#token` into a marker call the expression decoder recognizes,
/// so outer variables are evaluated at run time instead of being translated
/// into SQL identifiers. Recurses into nested groups.
pub(crate) fn mark_evaluated(input: TokenStream) -> TokenStream {
    let mut output = TokenStream::new();
    let mut iter = input.into_iter().peekable();
    while let Some(token) = iter.next() {
        match token {
            TokenTree::Punct(ref p) if p.as_char() == '#' && p.spacing() == Spacing::Alone => {
                let Some(inner) = iter.next() else {
                    output.extend([token]);
                    break;
                };
                let wrapped = quote!(__quern_evaluated__(#inner));
                output.extend([TokenTree::Group(Group::new(Delimiter::None, wrapped))]);
            }
            TokenTree::Group(group) => {
                let content = mark_evaluated(group.stream());
                output.extend([TokenTree::Group(Group::new(group.delimiter(), content))]);
            }
            other => output.extend([other]),
        }
    }
    output
}
