#[allow(unused_macros)]
macro_rules! debug {
    ({ $($field:tt)* }, $($arg:tt)* ) => {};
    ($($k:ident).+ = $($field:tt)*) => {};
    (?$($k:ident).+ = $($field:tt)*) => {};
    (%$($k:ident).+ = $($field:tt)*) => {};
    ($($k:ident).+, $($field:tt)*) => {};
    (?$($k:ident).+, $($field:tt)*) => {};
    (%$($k:ident).+, $($field:tt)*) => {};
    (?$($k:ident).+) => {};
    (%$($k:ident).+) => {};
    ($($k:ident).+) => {};
    ($($arg:tt)+) => {};
}

#[allow(unused_macros)]
macro_rules! trace {
    ({ $($field:tt)* }, $($arg:tt)* ) => {};
    ($($k:ident).+ = $($field:tt)*) => {};
    (?$($k:ident).+ = $($field:tt)*) => {};
    (%$($k:ident).+ = $($field:tt)*) => {};
    ($($k:ident).+, $($field:tt)*) => {};
    (?$($k:ident).+, $($field:tt)*) => {};
    (%$($k:ident).+, $($field:tt)*) => {};
    (?$($k:ident).+) => {};
    (%$($k:ident).+) => {};
    ($($k:ident).+) => {};
    ($($arg:tt)+) => {};
}
