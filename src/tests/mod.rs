#[cfg(test)]
mod common;

#[cfg(test)]
mod derivation_test;


#[cfg(test)]
mod syntax_test;
