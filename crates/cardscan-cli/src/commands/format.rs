//! Format command - render a field value the way the form displays it.

use clap::Args;

use cardscan_core::format::{readable, strip};
use cardscan_core::{mask_card_number, CardField};

use super::FieldArg;

/// Arguments for the format command.
#[derive(Args)]
pub struct FormatArgs {
    /// Field the value belongs to
    #[arg(value_enum)]
    field: FieldArg,

    /// Value, with or without display separators
    value: String,

    /// Print canonical digits instead of display text
    #[arg(long)]
    strip: bool,

    /// Mask all but the last four card digits
    #[arg(long)]
    mask: bool,
}

pub fn run(args: FormatArgs) -> anyhow::Result<()> {
    println!("{}", render(&args)?);
    Ok(())
}

fn render(args: &FormatArgs) -> anyhow::Result<String> {
    let field = CardField::from(args.field);
    let canonical = strip(field, &args.value);

    if args.mask && field != CardField::CardNumber {
        anyhow::bail!("--mask only applies to card numbers");
    }

    // Masked numbers come back already grouped.
    Ok(match (args.strip, args.mask) {
        (true, true) => mask_card_number(&canonical).replace(' ', ""),
        (true, false) => canonical,
        (false, true) => mask_card_number(&canonical),
        (false, false) => readable(field, &canonical),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(field: FieldArg, value: &str) -> FormatArgs {
        FormatArgs {
            field,
            value: value.to_string(),
            strip: false,
            mask: false,
        }
    }

    #[test]
    fn test_render_card_number() {
        let output = render(&args(FieldArg::Card, "4111111111111111")).unwrap();
        assert_eq!(output, "4111 1111 1111 1111");
    }

    #[test]
    fn test_render_expiry_from_display_text() {
        let mut a = args(FieldArg::Expiry, "09 / 27");
        assert_eq!(render(&a).unwrap(), "09 / 27");
        a.strip = true;
        assert_eq!(render(&a).unwrap(), "0927");
    }

    #[test]
    fn test_render_masked() {
        let mut a = args(FieldArg::Card, "4111 1111 1111 1234");
        a.mask = true;
        assert_eq!(render(&a).unwrap(), "•••• •••• •••• 1234");
    }

    #[test]
    fn test_render_masked_stripped() {
        let mut a = args(FieldArg::Card, "4111 1111 1111 1234");
        a.mask = true;
        a.strip = true;
        assert_eq!(render(&a).unwrap(), "••••••••••••1234");
    }

    #[test]
    fn test_mask_rejected_for_expiry() {
        let mut a = args(FieldArg::Expiry, "0927");
        a.mask = true;
        assert!(render(&a).is_err());
    }
}
