use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{format_ident, quote, quote_spanned};

/// Turns a function returning a request handler into a `#[test]` that runs every fixture under
/// the given directory against it.
///
/// ```ignore
/// fn configure(config: &mut E2eConfiguration) {
///     config.set_ignore_fields(vec!["id"]);
/// }
///
/// #[fixture_test("testdata", configure)]
/// fn api() -> impl fixture_e2e::Handler {
///     route
/// }
/// ```
#[proc_macro_attribute]
pub fn fixture_test(attrs: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as syn::ItemFn);
    let args = syn::parse_macro_input!(attrs as syn::AttributeArgs);

    if args.is_empty() || args.len() > 2 {
        return quote! {
            compile_error!("A fixture directory and an optional configuration function should be passed to the macro");
        }
        .into();
    }

    let fixture_root = if let syn::NestedMeta::Lit(syn::Lit::Str(parsed_root)) = &args[0] {
        if let Err(stream) = validate_fixture_root(&parsed_root.value(), parsed_root.span()) {
            return stream.into();
        }
        parsed_root.value()
    } else {
        return quote! {
            compile_error!("The first argument should be a string literal!");
        }
        .into();
    };

    let configure = match args.get(1) {
        Some(syn::NestedMeta::Meta(syn::Meta::Path(function_path))) => {
            quote! { #function_path(&mut __fixture_configuration); }
        }
        Some(_) => {
            return quote! {
                compile_error!("The second argument should be a configuration function!");
            }
            .into();
        }
        None => quote! {},
    };

    let test_name = &input.sig.ident;
    let attributes = &input.attrs;
    let mut handler_fn = input.clone();
    handler_fn.attrs.clear();
    handler_fn.sig.ident = format_ident!("__fixture_handler");

    let output = quote! {
        #[test]
        #(#attributes)*
        fn #test_name() {
            #handler_fn

            #[allow(unused_mut)]
            let mut __fixture_configuration = fixture_e2e::E2eConfiguration::new(#fixture_root);
            #configure
            fixture_e2e::run_fixture_test(__fixture_handler(), __fixture_configuration);
        }
    };

    TokenStream::from(output)
}

fn validate_fixture_root(path: &str, span: Span) -> Result<(), proc_macro2::TokenStream> {
    if path.trim().is_empty() {
        return Err(quote_spanned! {span=>
            compile_error!("The fixture directory shouldn't be empty!");
        });
    }

    Ok(())
}
