use pretty::termcolor::{ColorSpec, WriteColor};

pub type Alloc<'a> = pretty::Arena<'a, ColorSpec>;
pub type Builder<'a> = pretty::DocBuilder<'a, Alloc<'a>, ColorSpec>;

/// Configuration for the pretty-printer.
#[derive(Debug, Clone)]
pub struct PrintCfg {
    pub width: usize,
    /// Print metavariables as `?n` rather than an anonymous `?`.
    pub print_metavar_ids: bool,
}

impl Default for PrintCfg {
    fn default() -> Self {
        Self { width: crate::DEFAULT_WIDTH, print_metavar_ids: true }
    }
}

pub trait Print {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a>;

    fn print_to_string(&self, cfg: Option<&PrintCfg>) -> String {
        let alloc = Alloc::new();
        let cfg = cfg.cloned().unwrap_or_default();
        let doc = self.print(&cfg, &alloc);
        let mut buf = Vec::new();
        doc.1.render(cfg.width, &mut buf).expect("failed to render document");
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn print_colored<W: WriteColor>(
        &self,
        cfg: &PrintCfg,
        out: &mut W,
    ) -> Result<(), std::io::Error> {
        let alloc = Alloc::new();
        let doc = self.print(cfg, &alloc);
        doc.1.render_colored(cfg.width, out)
    }
}

impl<T: Print> Print for Box<T> {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        (**self).print(cfg, alloc)
    }
}

impl<T: Print> Print for std::rc::Rc<T> {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        (**self).print(cfg, alloc)
    }
}
