use std::env;
use std::path::Path;
use std::process;

use clap::{crate_version, App, AppSettings, Arg, ArgMatches};
use iseghal_configure::config::{ConfigError, IocConfig, EPICS_BASE_VAR};
use iseghal_configure::release::{write_release_files, CONFIGURE_DIR};

/// Exit status for bad command line input.
const USAGE_EXIT: i32 = 2;

fn fail(matches: &ArgMatches, e: ConfigError) -> ! {
    if e.is_usage_error() {
        eprintln!("error: {}\n\n{}\n\nFor more information try --help", e, matches.usage());
        process::exit(USAGE_EXIT);
    }
    eprintln!("Couldn't write release files to {}: {}", CONFIGURE_DIR, e);
    process::exit(1);
}

fn main() {
    env_logger::init();
    let app = App::new("isegHAL IOC configure")
        .version(crate_version!())
        .about("Configure this package for building")
        .setting(AppSettings::StrictUtf8)
        .after_help(
            "Example:\n    \
             iseghal-configure -i linux-x86_64=${HOME}/iseg/build-x86_64 linux-arm=${HOME}/iseg/build-arm",
        )
        .arg(
            Arg::with_name("epics-base")
                .short("e")
                .long("epics-base")
                .value_name("PATH")
                .takes_value(true)
                .help(
                    "Installation path of EPICS base. Environment variable $EPICS_BASE is used as default",
                ),
        )
        .arg(
            Arg::with_name("iseghal")
                .short("i")
                .long("iseghal")
                .value_name("TARGETARCH=PATH")
                .takes_value(true)
                .multiple(true)
                .min_values(0)
                .help(
                    "Installation path of isegHAL. Value should be \"TARGETARCH=PATH\". \
                     TARGETARCH may not be empty.",
                ),
        )
        .arg(
            Arg::with_name("modules")
                .short("m")
                .long("modules")
                .value_name("MODULE=PATH")
                .takes_value(true)
                .multiple(true)
                .min_values(0)
                .help(
                    "Add additional device support modules to the IOC. List them as \"MODULE=PATH\". \
                     Currently only CALC and AUTOSAVE are linked into the IOC.",
                ),
        );

    let matches = app.get_matches_safe().unwrap_or_else(|e| {
        if !e.use_stderr() {
            // --help and --version
            e.exit();
        }
        eprintln!("{}", e.message);
        process::exit(USAGE_EXIT);
    });

    let config = IocConfig::resolve(
        matches.value_of("epics-base"),
        env::var_os(EPICS_BASE_VAR),
        matches.values_of("iseghal").into_iter().flatten(),
        matches.values_of("modules").into_iter().flatten(),
    )
    .unwrap_or_else(|e| fail(&matches, e));

    let written =
        write_release_files(Path::new(CONFIGURE_DIR), &config).unwrap_or_else(|e| fail(&matches, e));
    log::debug!("configured {} release files", written.len());
}
