/// Banner printed before `--help` and for `--version`.
pub fn get_signature(version: &str) -> String {
    format!(
        r#"
  ┌─┐┌┬┐┌┬┐┌─┐┌┐┌   ┬─┐┌─┐┌─┐┌─┐
  ├─┤ ││ ││├ ┤│││───├┬┘├┤ ├─┘│ │    Addon repository generator
  ┴ ┴─┴┘─┴┘└─┘┘└┘   ┴└─└─┘┴  └─┘    Tracks addon releases and builds the manifest

  v{}
"#,
        version
    )
}
