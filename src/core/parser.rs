//! Directive parser - the syslinux config state machine
//!
//! See <https://wiki.syslinux.org/wiki/index.php?title=Config> for the format.
//! Only APPEND, DEFAULT, NERFDEFAULT, INCLUDE, INITRD, KERNEL/LINUX, LABEL,
//! MENU LABEL and MENU DEFAULT are understood; everything else is skipped.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use super::config::{directives, includes};
use super::error::Result;
use super::fetch::{Resource, Schemes};
use super::image::LinuxImage;
use super::initrd;
use super::order;
use super::url::{self, Url};

/// Where in the config the parser is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Before the first `label`.
    Global,
    /// After any `label`; never left again.
    Entry,
}

/// One recognized config line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Default(String),
    NerfDefault(String),
    Include(String),
    /// `menu label <text>`
    MenuLabel(String),
    /// `menu default`
    MenuDefault,
    Label(String),
    /// `kernel` or `linux`
    Kernel(String),
    Initrd(String),
    Append(String),
    /// Anything else; carries the keyword for logging.
    Unknown(String),
}

impl Directive {
    /// Parse one line. Lines with fewer than two fields carry no directive.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let keyword = fields.next()?.to_lowercase();
        let args: Vec<&str> = fields.collect();
        if args.is_empty() {
            return None;
        }
        let arg = args.join(" ");

        Some(match keyword.as_str() {
            directives::DEFAULT => Self::Default(arg),
            directives::NERF_DEFAULT => Self::NerfDefault(arg),
            directives::INCLUDE => Self::Include(arg),
            directives::MENU => Self::parse_menu(&args),
            directives::LABEL => Self::Label(arg),
            directives::KERNEL | directives::LINUX => Self::Kernel(arg),
            directives::INITRD => Self::Initrd(arg),
            directives::APPEND => Self::Append(arg),
            _ => Self::Unknown(keyword),
        })
    }

    fn parse_menu(args: &[&str]) -> Self {
        let Some((opt, rest)) = args.split_first() else {
            return Self::Unknown(directives::MENU.to_string());
        };
        match opt.to_lowercase().as_str() {
            directives::LABEL if !rest.is_empty() => Self::MenuLabel(rest.join(" ")),
            directives::DEFAULT => Self::MenuDefault,
            other => Self::Unknown(format!("{} {}", directives::MENU, other)),
        }
    }
}

/// Everything accumulated over one top-level parse, includes included.
#[derive(Debug)]
pub struct State {
    /// label -> entry; a repeated label replaces the earlier record.
    pub entries: HashMap<String, LinuxImage>,
    /// Labels in the order they appeared, repeats kept.
    pub label_order: Vec<String>,
    pub default_entry: String,
    pub nerf_default_entry: String,
    /// Command line given to labels declared after it.
    pub global_append: String,
    pub scope: Scope,
    pub cur_entry: Option<String>,
    /// label -> working directory of the file that declared it.
    pub entry_wd: HashMap<String, Option<Url>>,
}

impl State {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            label_order: Vec::new(),
            default_entry: String::new(),
            nerf_default_entry: String::new(),
            global_append: String::new(),
            scope: Scope::Global,
            cur_entry: None,
            entry_wd: HashMap::new(),
        }
    }

    /// The most recently declared entry, if it is still on record.
    pub fn current_entry_mut(&mut self) -> Option<&mut LinuxImage> {
        let label = self.cur_entry.as_ref()?;
        self.entries.get_mut(label)
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// Config parser bound to a working directory and a set of fetchers.
///
/// If a path in a config file is relative instead of a full URL, `wd` is
/// used as its working directory; the resulting URL is roughly
/// `wd.to_string() + "/" + path`. Files pulled in by `include` use their own
/// directory instead.
pub struct Parser<'s> {
    state: State,
    wd: Option<Url>,
    schemes: &'s Schemes,
    /// Configs being parsed right now, outermost first.
    open: Vec<Url>,
}

impl<'s> Parser<'s> {
    pub fn new(wd: Option<Url>, schemes: &'s Schemes) -> Self {
        Self {
            state: State::new(),
            wd,
            schemes,
            open: Vec::new(),
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Fetch the top-level config at `reference` and parse it.
    pub fn load(&mut self, reference: &str) -> Result<()> {
        let wd = self.wd.clone();
        let url = url::resolve(reference, wd.as_ref())?;
        let config = self.fetch_config(&url)?;
        self.open.push(url);
        let result = self.append(&config, wd.as_ref());
        self.open.pop();
        result
    }

    /// Fetch an included config and parse it relative to its own directory.
    ///
    /// Only a missing include file is skipped; failures raised while parsing
    /// its content propagate. Includes that would loop back into a config
    /// still being parsed, or nest deeper than [`includes::MAX_DEPTH`], are
    /// skipped as well.
    fn include(&mut self, reference: &str, wd: Option<&Url>) -> Result<()> {
        let url = url::resolve(reference, wd)?;

        if self.open.contains(&url) {
            warn!(include = %url, "include cycle, skipping");
            return Ok(());
        }
        if self.open.len() >= includes::MAX_DEPTH {
            warn!(include = %url, depth = self.open.len(), "includes nested too deep, skipping");
            return Ok(());
        }

        let config = match self.fetch_config(&url) {
            Err(err) if err.is_not_found() => {
                // Missing includes contribute nothing.
                warn!(include = %reference, error = %err, "failed to parse include");
                return Ok(());
            }
            result => result?,
        };

        let include_wd = url.parent();
        self.open.push(url);
        let result = self.append(&config, Some(&include_wd));
        self.open.pop();
        result
    }

    fn fetch_config(&self, url: &Url) -> Result<String> {
        let bytes = self.schemes.fetch(url)?;
        let config = String::from_utf8_lossy(&bytes).into_owned();
        debug!(url = %url, "got config file:\n{}", config);
        Ok(config)
    }

    /// Parse `config` line by line into the accumulated state.
    ///
    /// Relative references in `config` resolve against `wd`.
    pub fn append(&mut self, config: &str, wd: Option<&Url>) -> Result<()> {
        for line in config.lines() {
            if let Some(directive) = Directive::parse(line) {
                self.apply(directive, wd)?;
            }
        }
        Ok(())
    }

    fn apply(&mut self, directive: Directive, wd: Option<&Url>) -> Result<()> {
        let schemes = self.schemes;
        let state = &mut self.state;

        match directive {
            Directive::Default(label) => state.default_entry = label,

            Directive::NerfDefault(label) => state.nerf_default_entry = label,

            Directive::Include(reference) => self.include(&reference, wd)?,

            Directive::MenuLabel(name) => {
                if let Some(entry) = state.current_entry_mut() {
                    entry.name = name;
                }
            }

            // "Only valid after a LABEL statement" -syslinux wiki
            Directive::MenuDefault => {
                if state.scope == Scope::Entry {
                    if let Some(label) = state.cur_entry.clone() {
                        state.default_entry = label;
                    }
                }
            }

            Directive::Label(label) => {
                trace!(label = %label, "label");
                state.scope = Scope::Entry;
                state
                    .entries
                    .insert(label.clone(), LinuxImage::new(&label, &state.global_append));
                state.label_order.push(label.clone());
                state.entry_wd.insert(label.clone(), wd.cloned());
                state.cur_entry = Some(label);
            }

            Directive::Kernel(reference) => {
                if let Some(entry) = state.current_entry_mut() {
                    entry.kernel = Some(get_file(schemes, &reference, wd)?);
                }
            }

            // TODO: support multiple comma-separated initrds.
            Directive::Initrd(reference) => {
                if let Some(entry) = state.current_entry_mut() {
                    entry.initrd = Some(get_file(schemes, &reference, wd)?);
                }
            }

            Directive::Append(cmdline) => match state.scope {
                Scope::Global => state.global_append = cmdline,
                Scope::Entry => {
                    // Override, never concatenate: an entry append masks the
                    // global one, and the last append in a label wins.
                    if let Some(entry) = state.current_entry_mut() {
                        entry.cmdline = if cmdline == directives::APPEND_CLEAR {
                            String::new()
                        } else {
                            cmdline
                        };
                    }
                }
            },

            Directive::Unknown(keyword) => trace!(keyword = %keyword, "ignoring directive"),
        }
        Ok(())
    }

    /// Run the post-parse passes and hand the ordered images to the caller.
    pub fn finish(mut self) -> Result<Vec<LinuxImage>> {
        initrd::backfill(&mut self.state, self.schemes)?;
        Ok(order::resolve_order(self.state))
    }
}

/// Resolve `reference` against `wd` and acquire a lazy handle to it.
pub(crate) fn get_file(schemes: &Schemes, reference: &str, wd: Option<&Url>) -> Result<Resource> {
    let url = url::resolve(reference, wd)?;
    Ok(schemes.lazy_fetch(&url)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FetchError;
    use crate::core::fetch::{MemoryScheme, Scheme};

    fn parse(config: &str) -> State {
        let schemes = Schemes::new();
        let mut parser = Parser::new(None, &schemes);
        parser.append(config, None).unwrap();
        parser.state
    }

    fn mem_schemes() -> Schemes {
        let mut schemes = Schemes::new();
        schemes.register(
            "tftp",
            MemoryScheme::new()
                .with_file("h", "/pxe/k1", "one")
                .with_file("h", "/pxe/k2", "two")
                .with_file("h", "/pxe/initrd", "i"),
        );
        schemes
    }

    // ==================== Directive Lines ====================

    #[test]
    fn directive_keyword_is_case_insensitive() {
        assert_eq!(
            Directive::parse("LaBeL  linux"),
            Some(Directive::Label("linux".into()))
        );
        assert_eq!(
            Directive::parse("LINUX /vmlinuz"),
            Some(Directive::Kernel("/vmlinuz".into()))
        );
    }

    #[test]
    fn directive_arguments_are_rejoined() {
        assert_eq!(
            Directive::parse("\tappend  quiet\t splash  "),
            Some(Directive::Append("quiet splash".into()))
        );
    }

    #[test]
    fn short_lines_carry_nothing() {
        assert_eq!(Directive::parse(""), None);
        assert_eq!(Directive::parse("   "), None);
        assert_eq!(Directive::parse("prompt"), None);
        assert_eq!(Directive::parse("menu"), None);
    }

    #[test]
    fn menu_sub_directives() {
        assert_eq!(
            Directive::parse("MENU LABEL ^Install  Linux"),
            Some(Directive::MenuLabel("^Install Linux".into()))
        );
        assert_eq!(Directive::parse("menu default"), Some(Directive::MenuDefault));
        assert_eq!(
            Directive::parse("menu label"),
            Some(Directive::Unknown("menu label".into()))
        );
        assert_eq!(
            Directive::parse("menu title Boot"),
            Some(Directive::Unknown("menu title".into()))
        );
    }

    #[test]
    fn unknown_keyword() {
        assert_eq!(
            Directive::parse("timeout 50"),
            Some(Directive::Unknown("timeout".into()))
        );
    }

    // ==================== Scoping ====================

    #[test]
    fn label_enters_entry_scope_forever() {
        let state = parse("append global\nlabel a\nappend local");
        assert_eq!(state.scope, Scope::Entry);
        assert_eq!(state.global_append, "global");
        assert_eq!(state.entries["a"].cmdline, "local");
    }

    #[test]
    fn entry_append_overrides() {
        let state = parse("append X\nlabel A\nappend Y\nappend Z");
        assert_eq!(state.entries["A"].cmdline, "Z");
    }

    #[test]
    fn entry_append_dash_clears() {
        let state = parse("append X\nlabel A\nappend -");
        assert_eq!(state.entries["A"].cmdline, "");
    }

    #[test]
    fn global_append_snapshot_at_declaration() {
        let state = parse("append one\nlabel a\nlabel b");
        assert_eq!(state.entries["a"].cmdline, "one");
        assert_eq!(state.entries["b"].cmdline, "one");
    }

    #[test]
    fn menu_default_needs_entry_scope() {
        let state = parse("menu default\nlabel a\nlabel b");
        assert_eq!(state.default_entry, "");

        let state = parse("label a\nmenu default\nlabel b");
        assert_eq!(state.default_entry, "a");
    }

    #[test]
    fn default_is_taken_verbatim() {
        let state = parse("default  no such  label\nnerfdefault x");
        assert_eq!(state.default_entry, "no such label");
        assert_eq!(state.nerf_default_entry, "x");
        assert!(state.entries.is_empty());
    }

    #[test]
    fn menu_label_renames_without_reidentifying() {
        let state = parse("label a\nmenu label Fancy A\nlabel b");
        assert_eq!(state.entries["a"].label, "a");
        assert_eq!(state.entries["a"].name, "Fancy A");
        assert_eq!(state.entries["b"].name, "b");
        assert_eq!(state.label_order, vec!["a", "b"]);
    }

    #[test]
    fn entry_directives_before_label_are_ignored() {
        // An empty registry would fail any fetch, so success means none ran.
        let state = parse("kernel vmlinuz\ninitrd initrd.img\nmenu label x\nmenu default");
        assert!(state.entries.is_empty());
        assert!(state.cur_entry.is_none());
        assert_eq!(state.default_entry, "");
    }

    #[test]
    fn repeated_label_resets_record_and_repeats_order() {
        let state = parse("label a\nappend first\nlabel b\nlabel a");
        assert_eq!(state.label_order, vec!["a", "b", "a"]);
        assert_eq!(state.entries.len(), 2);
        assert_eq!(state.entries["a"].cmdline, "");
    }

    // ==================== Fetching ====================

    #[test]
    fn kernel_and_initrd_resolve_against_wd() {
        let schemes = mem_schemes();
        let wd = Url::parse("tftp://h/pxe").unwrap();
        let mut parser = Parser::new(Some(wd.clone()), &schemes);
        parser
            .append("label a\nkernel k1\nlinux ./k2\ninitrd initrd", Some(&wd))
            .unwrap();

        let entry = &parser.state().entries["a"];
        assert_eq!(entry.kernel.as_ref().unwrap().url().to_string(), "tftp://h/pxe/k2");
        assert_eq!(entry.initrd.as_ref().unwrap().url().to_string(), "tftp://h/pxe/initrd");
    }

    #[test]
    fn kernel_fetch_failure_is_fatal() {
        let schemes = mem_schemes();
        let wd = Url::parse("tftp://h/pxe").unwrap();
        let mut parser = Parser::new(Some(wd.clone()), &schemes);
        let err = parser.append("label a\nkernel missing", Some(&wd)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn initrd_fetch_failure_is_fatal() {
        let schemes = mem_schemes();
        let wd = Url::parse("tftp://h/pxe").unwrap();
        let mut parser = Parser::new(Some(wd.clone()), &schemes);
        let err = parser
            .append("label a\nkernel k1\ninitrd missing.img", Some(&wd))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    // ==================== Includes ====================

    fn include_schemes(files: &[(&str, &str)]) -> Schemes {
        let scheme = files
            .iter()
            .fold(MemoryScheme::new(), |scheme, (path, content)| {
                scheme.with_file("h", path, *content)
            });
        let mut schemes = Schemes::new();
        schemes.register("tftp", scheme);
        schemes
    }

    #[test]
    fn self_include_is_skipped() {
        let schemes = include_schemes(&[("/pxe/a.cfg", "label a\ninclude a.cfg\nlabel b")]);
        let mut parser = Parser::new(Url::parse("tftp://h/pxe").ok(), &schemes);
        parser.load("a.cfg").unwrap();
        assert_eq!(parser.state().label_order, vec!["a", "b"]);
    }

    #[test]
    fn mutual_include_is_skipped() {
        let schemes = include_schemes(&[
            ("/pxe/a.cfg", "label a\ninclude b.cfg"),
            ("/pxe/b.cfg", "label b\ninclude a.cfg\nlabel c"),
        ]);
        let mut parser = Parser::new(Url::parse("tftp://h/pxe").ok(), &schemes);
        parser.load("a.cfg").unwrap();
        assert_eq!(parser.state().label_order, vec!["a", "b", "c"]);
    }

    #[test]
    fn repeated_include_outside_a_cycle_is_applied() {
        let schemes = include_schemes(&[
            ("/pxe/a.cfg", "include common.cfg\ninclude common.cfg"),
            ("/pxe/common.cfg", "label c"),
        ]);
        let mut parser = Parser::new(Url::parse("tftp://h/pxe").ok(), &schemes);
        parser.load("a.cfg").unwrap();
        assert_eq!(parser.state().label_order, vec!["c", "c"]);
    }

    #[test]
    fn include_depth_is_bounded() {
        // Each level includes a fresh path one directory further down.
        let mut schemes = Schemes::new();
        schemes.register("tftp", DeepScheme);
        let mut parser = Parser::new(Url::parse("tftp://h/").ok(), &schemes);
        parser.load("n.cfg").unwrap();
        assert_eq!(parser.state().label_order.len(), includes::MAX_DEPTH);
    }

    /// Serves `label n\ninclude d/n.cfg` at every path.
    #[derive(Debug)]
    struct DeepScheme;

    impl Scheme for DeepScheme {
        fn fetch(&self, _url: &Url) -> std::result::Result<Vec<u8>, FetchError> {
            Ok(b"label n\ninclude d/n.cfg".to_vec())
        }

        fn lazy_fetch(&self, url: &Url) -> std::result::Result<Resource, FetchError> {
            Err(FetchError::NotFound {
                url: url.to_string(),
            })
        }
    }

    #[test]
    fn entry_remembers_declaring_directory() {
        let schemes = include_schemes(&[
            ("/pxe/a.cfg", "label top\ninclude sub/b.cfg"),
            ("/pxe/sub/b.cfg", "label inner"),
        ]);
        let mut parser = Parser::new(Url::parse("tftp://h/pxe").ok(), &schemes);
        parser.load("a.cfg").unwrap();
        let wd_of = |label: &str| parser.state().entry_wd[label].as_ref().map(Url::to_string);
        assert_eq!(wd_of("top").as_deref(), Some("tftp://h/pxe"));
        assert_eq!(wd_of("inner").as_deref(), Some("tftp://h/pxe/sub"));
    }
}
