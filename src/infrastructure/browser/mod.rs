pub(crate) mod webdriver;
