//! Selectors tied to the current DOM of the X web front-end.

pub mod search {
    use crate::browser::Locator;

    /// Every rendered cell of the timeline; the reply text is in its first text span.
    pub const REPLY: Locator = Locator::nested("div.css-175oi2r", "span.css-1jxf684");
}

pub mod followers {
    use crate::browser::Locator;

    pub const HANDLE: Locator = Locator::new("span.css-1jxf684");
}

pub mod login {
    pub const EMAIL: &str = "input[name='text']";
    pub const HANDLE: &str = "input[data-testid='ocfEnterTextTextInput']";
    pub const PASSWORD: &str = "input[name='password']";
}
