//! Template sources for Linux bundling.

/// Startup shell script placed next to the bundled app.
pub const STARTUP_SH: &str = r#"#!/bin/sh
# {{display_name}} startup script
APP_DIR=$(cd "$(dirname "$0")" && pwd)
{{#if use_resources_as_working_dir}}
cd "$APP_DIR"
{{/if}}
{{#if env_path}}
export PATH="{{env_path}}:$PATH"
{{/if}}
{{#if bundle_jre}}
if [ -x "$APP_DIR/{{jre_directory_name}}/bin/java" ]; then
    JAVA="$APP_DIR/{{jre_directory_name}}/bin/java"
else
    JAVA=java
fi
{{else}}
JAVA=java
{{/if}}
{{#if administrator_required}}
if [ "$(id -u)" -ne 0 ]; then
    if command -v pkexec >/dev/null 2>&1; then
        exec pkexec "$0" "$@"
    else
        exec sudo "$0" "$@"
    fi
fi
{{/if}}
{{#if main_class}}
exec "$JAVA"{{#each vm_args}} {{this}}{{/each}} -cp "{{classpath}}" {{main_class}} "$@"
{{else}}
exec "$JAVA"{{#each vm_args}} {{this}}{{/each}} -jar "$APP_DIR/{{jar_name}}" "$@"
{{/if}}
"#;

/// Freedesktop menu entry installed by the DEB/RPM packages.
pub const DESKTOP_ENTRY: &str = r#"[Desktop Entry]
Type=Application
Name={{display_name}}
Comment={{description}}
Exec=/opt/{{name}}/{{name}}
Icon=/opt/{{name}}/{{icon_name}}
Terminal=false
Categories={{categories}};
"#;

/// Debian binary package control file.
///
/// Blank lines separate paragraphs in control files, so the conditional
/// stays inline.
pub const DEB_CONTROL: &str = r#"Package: {{package_name}}
Version: {{version}}
Section: misc
Priority: optional
Architecture: {{arch}}
Maintainer: {{maintainer}}
{{#if url}}Homepage: {{url}}
{{/if}}Description: {{description}}
"#;

/// RPM spec for a pre-built binary payload.
pub const RPM_SPEC: &str = r#"Name: {{package_name}}
Version: {{rpm_version}}
Release: 1
Summary: {{description}}
License: {{license_name}}
AutoReqProv: no

%description
{{description}}

%install
mkdir -p %{buildroot}/opt/{{name}}
cp -pr {{app_folder}}/. %{buildroot}/opt/{{name}}
mkdir -p %{buildroot}/usr/share/applications
cp -p {{desktop_file}} %{buildroot}/usr/share/applications/{{name}}.desktop

%files
/opt/{{name}}
/usr/share/applications/{{name}}.desktop
"#;
