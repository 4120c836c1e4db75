use pretty::RcDoc;

pub mod regex;
pub mod simple;

pub trait PrettyPrint {
    fn to_doc(&self) -> RcDoc<'_, ()>;

    fn to_pretty(&self) -> String {
        self.to_doc()
            .pretty(usize::MAX) // everything on one line
            .to_string()
    }
}

/// `ts` with `separator` and a space between consecutive items.
pub fn separated<'a, T: 'a + PrettyPrint>(
    ts: impl IntoIterator<Item = &'a T>,
    separator: &'a str,
) -> RcDoc<'a, ()> {
    RcDoc::intersperse(
        ts.into_iter().map(PrettyPrint::to_doc),
        RcDoc::text(separator).append(RcDoc::space()),
    )
}

/// Wrap `doc` in parentheses when its precedence is below `threshold`.
pub fn bracket(doc: RcDoc<'_, ()>, precedence: u8, threshold: u8) -> RcDoc<'_, ()> {
    if precedence < threshold {
        RcDoc::text("(").append(doc).append(RcDoc::text(")"))
    } else {
        doc
    }
}
