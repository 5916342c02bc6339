pub const GO_COMMAND: &str = "go";

pub const GO_LIST_ARGS: &[&str] = &["list"];

pub const GO_TEST_LIST_ARGS: &[&str] = &["test", "-list"];
pub const DEFAULT_RUN_PATTERN: &str = ".";
pub const TEST_PREFIX: &str = "Test";

pub const GO_TEST_COMPILE_FLAGS: &[&str] = &["-cover", "-c", "-o"];
pub const TEST_BINARY_SUFFIX: &str = ".test";

pub const TEST2JSON_ARGS: &[&str] = &["tool", "test2json"];
pub const TEST_RUN_FLAG: &str = "-test.run";
pub const TEST_COVERPROFILE_FLAG: &str = "-test.coverprofile";
pub const TEST_OUTPUTDIR_FLAG: &str = "-test.outputdir";
pub const TEST_VERBOSE_FLAG: &str = "-test.v";
pub const TEST_SHORT_FLAG: &str = "-test.short";

pub const COVER_PROFILE_SUFFIX: &str = ".out";
