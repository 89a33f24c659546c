//! Derive macro for `data_annotations::Annotated`.

use proc_macro::TokenStream;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{
    Attribute, Data, DeriveInput, Fields, GenericArgument, Ident, LitInt, LitStr, PathArguments,
    Token, Type,
};

/// Derive `data_annotations::Subject` and `data_annotations::Annotated` from
/// `#[annotate(...)]` attributes.
#[proc_macro_derive(Annotated, attributes(annotate))]
pub fn derive_annotated(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand_annotated(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_annotated(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Annotated cannot be derived for generic types",
        ));
    }
    let Data::Struct(struct_data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Annotated can only be derived for structs",
        ));
    };
    let fields = match &struct_data.fields {
        Fields::Named(fields) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                &struct_data.fields,
                "Annotated requires named fields",
            ));
        },
    };

    let container = parse_container_options(&input.attrs)?;
    let name = &input.ident;
    let type_name = LitStr::new(
        &container.name.unwrap_or_else(|| name.to_string()),
        name.span(),
    );

    let mut seen = Vec::new();
    let mut arms = Vec::new();
    let mut members = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let options = parse_field_options(&field.attrs, ident)?;
        if seen.contains(&options.member) {
            return Err(syn::Error::new_spanned(
                ident,
                format!("duplicate member name `{}`", options.member),
            ));
        }
        seen.push(options.member.clone());

        let member_name = LitStr::new(&options.member, ident.span());
        let accessor = if option_inner(&field.ty).is_some() {
            quote! { ::data_annotations::__private::optional_member(&self.#ident) }
        } else {
            quote! { ::data_annotations::__private::member(&self.#ident) }
        };
        arms.push(quote! { #member_name => #accessor });
        members.push(expand_member(&member_name, &options));
    }

    let mut metadata = quote! { ::data_annotations::TypeMetadata::builder(#type_name) };
    if container.not_mapped {
        metadata = quote! { #metadata.not_mapped() };
    }
    match (container.table, container.schema) {
        (Some(table), schema) => {
            let schema = schema.map_or_else(
                || quote! { ::core::option::Option::None },
                |schema| quote! { ::core::option::Option::Some(#schema) },
            );
            metadata = quote! { ::data_annotations::__private::table(#metadata, #table, #schema) };
        },
        (None, Some(schema)) => {
            return Err(syn::Error::new_spanned(
                schema,
                "annotate(schema) requires annotate(table)",
            ));
        },
        (None, None) => {},
    }

    Ok(quote! {
        impl ::data_annotations::Subject for #name {
            fn type_name(&self) -> &'static str {
                #type_name
            }

            fn member_value(&self, member: &str) -> ::core::option::Option<&dyn ::core::any::Any> {
                match member {
                    #(#arms,)*
                    _ => ::core::option::Option::None,
                }
            }

            fn type_metadata(
                &self,
            ) -> ::core::option::Option<::std::sync::Arc<::data_annotations::TypeMetadata>> {
                ::core::option::Option::Some(<Self as ::data_annotations::Annotated>::metadata())
            }
        }

        impl ::data_annotations::Annotated for #name {
            fn metadata() -> ::std::sync::Arc<::data_annotations::TypeMetadata> {
                static METADATA: ::std::sync::OnceLock<
                    ::std::sync::Arc<::data_annotations::TypeMetadata>,
                > = ::std::sync::OnceLock::new();
                ::std::sync::Arc::clone(METADATA.get_or_init(|| {
                    ::std::sync::Arc::new(#metadata #(.member(#members))*.build())
                }))
            }
        }
    })
}

fn expand_member(member_name: &LitStr, options: &FieldOptions) -> proc_macro2::TokenStream {
    let mut member = quote! { ::data_annotations::MemberMetadata::new(#member_name) };
    if let Some(display) = &options.display {
        member = quote! { #member.display(::data_annotations::DisplayAttribute::new(#display)) };
    }
    if options.concurrency_check {
        member = quote! { #member.concurrency_check() };
    }
    if options.not_mapped {
        member = quote! { #member.not_mapped() };
    }
    if let Some(generated) = &options.database_generated {
        member = quote! {
            #member.database_generated(::data_annotations::DatabaseGeneratedOption::#generated)
        };
    }
    if let Some(column) = &options.column {
        member = quote! { ::data_annotations::__private::column(#member, #column) };
    }
    if let Some(foreign_key) = &options.foreign_key {
        member = quote! { ::data_annotations::__private::foreign_key(#member, #foreign_key) };
    }
    for rule in &options.rules {
        let mut rule = match rule {
            Rule::Required => quote! { ::data_annotations::RequiredRule::new() },
            Rule::FileExtensions(None) => quote! { ::data_annotations::FileExtensionsRule::new() },
            Rule::FileExtensions(Some(extensions)) => quote! {
                ::data_annotations::FileExtensionsRule::with_extensions(#extensions)
            },
        };
        if let Some(message) = &options.error_message {
            rule = quote! { ::data_annotations::RuleBuilder::with_error_message(#rule, #message) };
        }
        if let Some(order) = options.order {
            rule = quote! { ::data_annotations::RuleBuilder::with_order(#rule, #order) };
        }
        member = quote! { #member.rule(#rule) };
    }
    member
}

#[derive(Default)]
struct ContainerOptions {
    name: Option<String>,
    table: Option<LitStr>,
    schema: Option<LitStr>,
    not_mapped: bool,
}

fn parse_container_options(attrs: &[Attribute]) -> Result<ContainerOptions, syn::Error> {
    let mut options = ContainerOptions::default();
    for attr in attrs {
        if !attr.path().is_ident("annotate") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value = non_blank(&meta, "name")?;
                set_once(&meta, &mut options.name, value.value(), "name")?;
                return Ok(());
            }
            if meta.path.is_ident("table") {
                let value = non_blank(&meta, "table")?;
                set_once(&meta, &mut options.table, value, "table")?;
                return Ok(());
            }
            if meta.path.is_ident("schema") {
                let value = non_blank(&meta, "schema")?;
                set_once(&meta, &mut options.schema, value, "schema")?;
                return Ok(());
            }
            if meta.path.is_ident("not_mapped") {
                options.not_mapped = true;
                return Ok(());
            }
            Err(meta.error("unsupported annotate attribute on container"))
        })?;
    }
    Ok(options)
}

enum Rule {
    Required,
    FileExtensions(Option<LitStr>),
}

struct FieldOptions {
    member: String,
    display: Option<LitStr>,
    rules: Vec<Rule>,
    error_message: Option<LitStr>,
    order: Option<i32>,
    concurrency_check: bool,
    column: Option<LitStr>,
    not_mapped: bool,
    foreign_key: Option<LitStr>,
    database_generated: Option<Ident>,
}

fn parse_field_options(attrs: &[Attribute], ident: &Ident) -> Result<FieldOptions, syn::Error> {
    let mut member: Option<String> = None;
    let mut options = FieldOptions {
        member: String::new(),
        display: None,
        rules: Vec::new(),
        error_message: None,
        order: None,
        concurrency_check: false,
        column: None,
        not_mapped: false,
        foreign_key: None,
        database_generated: None,
    };
    for attr in attrs {
        if !attr.path().is_ident("annotate") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("member") {
                let value = non_blank(&meta, "member")?;
                set_once(&meta, &mut member, value.value(), "member")?;
                return Ok(());
            }
            if meta.path.is_ident("display") {
                let value: LitStr = meta.value()?.parse()?;
                set_once(&meta, &mut options.display, value, "display")?;
                return Ok(());
            }
            if meta.path.is_ident("required") {
                options.rules.push(Rule::Required);
                return Ok(());
            }
            if meta.path.is_ident("file_extensions") {
                let extensions = if meta.input.peek(Token![=]) {
                    Some(meta.value()?.parse::<LitStr>()?)
                } else {
                    None
                };
                options.rules.push(Rule::FileExtensions(extensions));
                return Ok(());
            }
            if meta.path.is_ident("error_message") {
                let value: LitStr = meta.value()?.parse()?;
                set_once(&meta, &mut options.error_message, value, "error_message")?;
                return Ok(());
            }
            if meta.path.is_ident("order") {
                let value = parse_order(&meta)?;
                set_once(&meta, &mut options.order, value, "order")?;
                return Ok(());
            }
            if meta.path.is_ident("concurrency_check") {
                options.concurrency_check = true;
                return Ok(());
            }
            if meta.path.is_ident("column") {
                let value = non_blank(&meta, "column")?;
                set_once(&meta, &mut options.column, value, "column")?;
                return Ok(());
            }
            if meta.path.is_ident("not_mapped") {
                options.not_mapped = true;
                return Ok(());
            }
            if meta.path.is_ident("foreign_key") {
                let value = non_blank(&meta, "foreign_key")?;
                set_once(&meta, &mut options.foreign_key, value, "foreign_key")?;
                return Ok(());
            }
            if meta.path.is_ident("database_generated") {
                let value: LitStr = meta.value()?.parse()?;
                let variant = match value.value().as_str() {
                    "identity" => "Identity",
                    "computed" => "Computed",
                    "none" => "None",
                    _ => {
                        return Err(syn::Error::new_spanned(
                            &value,
                            "database_generated must be \"identity\", \"computed\", or \"none\"",
                        ));
                    },
                };
                let variant = Ident::new(variant, value.span());
                set_once(
                    &meta,
                    &mut options.database_generated,
                    variant,
                    "database_generated",
                )?;
                return Ok(());
            }
            Err(meta.error("unsupported annotate attribute on field"))
        })?;
    }
    if options.rules.is_empty() && (options.error_message.is_some() || options.order.is_some()) {
        return Err(syn::Error::new_spanned(
            ident,
            "error_message and order require a rule on the same field",
        ));
    }
    options.member = member.unwrap_or_else(|| ident.to_string());
    Ok(options)
}

fn set_once<T>(
    meta: &ParseNestedMeta<'_>,
    slot: &mut Option<T>,
    value: T,
    key: &str,
) -> Result<(), syn::Error> {
    if slot.is_some() {
        return Err(meta.error(format!("duplicate annotate({key} = ...)")));
    }
    *slot = Some(value);
    Ok(())
}

fn non_blank(meta: &ParseNestedMeta<'_>, key: &str) -> Result<LitStr, syn::Error> {
    let value: LitStr = meta.value()?.parse()?;
    if value.value().trim().is_empty() {
        return Err(syn::Error::new_spanned(
            &value,
            format!("annotate({key}) must not be blank"),
        ));
    }
    Ok(value)
}

fn parse_order(meta: &ParseNestedMeta<'_>) -> Result<i32, syn::Error> {
    let input = meta.value()?;
    let negative = input.peek(Token![-]);
    if negative {
        input.parse::<Token![-]>()?;
    }
    let literal: LitInt = input.parse()?;
    let magnitude: i64 = literal.base10_parse()?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value)
        .map_err(|_| syn::Error::new_spanned(&literal, "order must fit in an i32"))
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    })
}
