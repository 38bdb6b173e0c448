use proc_macro2::TokenStream as TokenStream2;
use syn::Token;
use syn::parse::{self, Parse, ParseStream};

/// Arguments of `#[context(...)]`: an optional leading `move,` followed by `format!` arguments.
#[derive(Debug)]
pub struct Args(pub Option<Token![move]>, pub TokenStream2);

impl Parse for Args {
	fn parse(input: ParseStream<'_>) -> parse::Result<Self> {
		let move_token = if input.peek(Token![move]) {
			let token = input.parse()?;
			input.parse::<Token![,]>()?;
			Some(token)
		} else {
			None
		};
		Ok(Self(move_token, input.parse()?))
	}
}

#[cfg(test)]
mod tests {
	use super::Args;
	use syn::parse_str;

	#[test]
	fn format_string_only() {
		let args: Args = parse_str(r#""reading tile {}", coord"#).unwrap();
		assert!(args.0.is_none());
		let tokens = args.1.to_string();
		assert!(tokens.starts_with(r#""reading tile {}""#));
		assert!(tokens.ends_with("coord"));
	}

	#[test]
	fn leading_move() {
		let args: Args = parse_str(r#"move, "writing level {level}""#).unwrap();
		assert!(args.0.is_some());
		assert_eq!(args.1.to_string(), r#""writing level {level}""#);
	}

	#[test]
	fn move_without_comma_is_rejected() {
		let err = parse_str::<Args>("move foo").unwrap_err();
		assert!(err.to_string().contains(','), "unexpected error: {err}");
	}
}
