//! Template and launcher resources for macOS bundling.

/// Info.plist rendered into `Contents` when no custom one is supplied.
pub const INFO_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
<key>CFBundleDevelopmentRegion</key>
<string>English</string>
<key>CFBundleExecutable</key>
<string>{{executable_name}}</string>
<key>CFBundleIconFile</key>
<string>{{icon_name}}</string>
<key>CFBundleIdentifier</key>
<string>{{app_id}}</string>
<key>CFBundleDisplayName</key>
<string>{{display_name}}</string>
<key>CFBundleName</key>
<string>{{name}}</string>
<key>CFBundlePackageType</key>
<string>APPL</string>
<key>CFBundleShortVersionString</key>
<string>{{version}}</string>
<key>CFBundleVersion</key>
<string>{{version}}</string>
<key>CFBundleInfoDictionaryVersion</key>
<string>6.0</string>
<key>NSHighResolutionCapable</key>
<true/>
<key>NSHumanReadableCopyright</key>
<string>{{organization_name}}</string>
<key>JVMMainClassName</key>
<string>{{main_class}}</string>
<key>JVMClassPath</key>
<string>{{classpath}}</string>
<key>JVMOptions</key>
<array>
{{#each vm_args}}
<string>{{this}}</string>
{{/each}}
</array>
</dict>
</plist>
"#;

/// Elevation helper rendered as `MacOS/startup` when administrator
/// privileges are required. Relaunches the launcher stub elevated.
pub const STARTUP_SCRIPT: &str = r#"#!/bin/sh
# {{display_name}} elevation helper
DIR=$(cd "$(dirname "$0")" && pwd)
exec osascript -e "do shell script quoted form of \"$DIR/{{stub_name}}\" with administrator privileges"
"#;

/// Generic launcher stub placed in `Contents/MacOS`.
///
/// Reads the JVM settings from Info.plist, prefers the bundled runtime and
/// falls back to the system Java.
pub const LAUNCHER_STUB: &[u8] = br#"#!/bin/bash
PRG="$0"
while [ -h "$PRG" ]; do
    PRG=$(readlink "$PRG")
done
CONTENTS=$(cd "$(dirname "$PRG")/.." && pwd)
RESOURCES="$CONTENTS/Resources"
PLIST="$CONTENTS/Info.plist"

plist_value() {
    /usr/libexec/PlistBuddy -c "Print :$1" "$PLIST" 2>/dev/null
}

JAVA=java
for home in "$CONTENTS"/PlugIns/*/Contents/Home; do
    if [ -x "$home/bin/java" ]; then
        JAVA="$home/bin/java"
        break
    fi
done

cd "$RESOURCES"

MAIN_CLASS=$(plist_value JVMMainClassName)
CLASS_PATH=$(plist_value JVMClassPath)
OPTIONS=()
index=0
while true; do
    option=$(plist_value "JVMOptions:$index") || break
    [ -z "$option" ] && break
    OPTIONS+=("$option")
    index=$((index + 1))
done

if [ -n "$MAIN_CLASS" ]; then
    exec "$JAVA" "${OPTIONS[@]}" -cp "$CLASS_PATH" "$MAIN_CLASS" "$@"
fi

for jar in "$RESOURCES"/Java/*.jar "$RESOURCES"/*.jar; do
    if [ -f "$jar" ]; then
        exec "$JAVA" "${OPTIONS[@]}" -jar "$jar" "$@"
    fi
done

echo "No runnable JAR found in $RESOURCES" >&2
exit 1
"#;
