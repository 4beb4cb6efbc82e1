//! Client code samples shown on every method page.
//!
//! Each method gets a gRPC sample in JavaScript and in Python. Methods with a
//! REST mapping also get REST samples in both languages, except methods whose
//! client streams requests: the REST proxy only serves those over websockets.
//!
//! Samples are built from the request message *after* the method's REST
//! mapping has been applied, so path, query and body fields land where the
//! gateway expects them.

use crate::method::{Method, StreamingDirection};
use crate::registry::{Field, Message, RestPlacement};
use heck::{ToLowerCamelCase, ToSnakeCase};
use serde::Serialize;
use std::fmt::{Result, Write};
use std::path::Path;

const GRPC_HOST: &str = "localhost:10009";
const REST_HOST: &str = "localhost:8080";
const MACAROON_PATH: &str = "LND_DIR/data/chain/bitcoin/simnet/admin.macaroon";
const TLS_CERT_PATH: &str = "LND_DIR/tls.cert";

/// Ready-to-run snippets for one method.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CodeSamples {
    pub grpc_js: String,
    pub grpc_py: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_js: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_py: Option<String>,
}

impl CodeSamples {
    /// Builds the samples for `method`, whose resolved request is `request`.
    pub fn generate(method: &Method, request: &Message) -> std::result::Result<Self, std::fmt::Error> {
        let with_rest = method.has_rest_mapping() && !method.request_type.streaming;
        let target = Target::new(method);

        Ok(Self {
            grpc_js: grpc_js(&target, request)?,
            grpc_py: grpc_py(&target, request)?,
            rest_js: if with_rest {
                Some(rest_js(&target, request)?)
            } else {
                None
            },
            rest_py: if with_rest {
                Some(rest_py(&target, request)?)
            } else {
                None
            },
        })
    }

    pub fn is_empty(&self) -> bool {
        self.grpc_js.is_empty() && self.grpc_py.is_empty()
    }
}

/// The bits of a method the snippets refer to.
struct Target<'a> {
    method: &'a str,
    service: &'a str,
    /// Package name usable as a JavaScript or Python identifier
    package: String,
    proto_file: String,
    proto_module: String,
    streaming: StreamingDirection,
    rest_verb: String,
    rest_path: &'a str,
}

impl<'a> Target<'a> {
    fn new(method: &'a Method) -> Self {
        let proto_module = Path::new(&method.source)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| method.service.to_snake_case());
        let proto_file = if method.source.is_empty() {
            format!("{}.proto", proto_module)
        } else {
            method.source.clone()
        };

        Self {
            method: &method.name,
            service: &method.service,
            package: method.package.replace('.', "_"),
            proto_file,
            proto_module,
            streaming: method.streaming_direction(),
            rest_verb: method.rest_method().to_lowercase(),
            rest_path: method.rest_path(),
        }
    }
}

fn placeholder(field: &Field) -> String {
    if field.is_repeated() {
        format!("<array {}>", field.type_name)
    } else {
        format!("<{}>", field.type_name)
    }
}

fn fields_in<'m>(request: &'m Message, placement: RestPlacement) -> Vec<&'m Field> {
    request
        .fields
        .iter()
        .filter(|f| f.rest_placement == placement)
        .collect()
}

/// Writes `name = { key: <type>, ... };` style object literals.
fn write_js_object(out: &mut String, prefix: &str, fields: &[&Field], suffix: &str) -> Result {
    if fields.is_empty() {
        return writeln!(out, "{}{{}}{}", prefix, suffix);
    }
    writeln!(out, "{}{{", prefix)?;
    for field in fields {
        writeln!(out, "  {}: {},", field.name, placeholder(field))?;
    }
    writeln!(out, "}}{}", suffix)
}

fn write_py_dict(out: &mut String, name: &str, fields: &[&Field]) -> Result {
    writeln!(out, "{} = {{", name)?;
    for field in fields {
        writeln!(out, "    '{}': {},", field.name, placeholder(field))?;
    }
    writeln!(out, "}}")
}

fn grpc_js(target: &Target, request: &Message) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();
    let pkg = &target.package;

    writeln!(out, "const fs = require('fs');")?;
    writeln!(out, "const grpc = require('@grpc/grpc-js');")?;
    writeln!(out, "const protoLoader = require('@grpc/proto-loader');")?;
    writeln!(out, "const loaderOptions = {{")?;
    writeln!(out, "  keepCase: true,")?;
    writeln!(out, "  longs: String,")?;
    writeln!(out, "  enums: String,")?;
    writeln!(out, "  defaults: true,")?;
    writeln!(out, "  oneofs: true,")?;
    writeln!(out, "}};")?;
    writeln!(
        out,
        "const packageDefinition = protoLoader.loadSync('{}', loaderOptions);",
        target.proto_file
    )?;
    writeln!(
        out,
        "const {} = grpc.loadPackageDefinition(packageDefinition).{};",
        pkg, pkg
    )?;
    writeln!(
        out,
        "const macaroon = fs.readFileSync('{}').toString('hex');",
        MACAROON_PATH
    )?;
    writeln!(out, "process.env.GRPC_SSL_CIPHER_SUITES = 'HIGH+ECDSA';")?;
    writeln!(out, "const lndCert = fs.readFileSync('{}');", TLS_CERT_PATH)?;
    writeln!(out, "const sslCreds = grpc.credentials.createSsl(lndCert);")?;
    writeln!(
        out,
        "const macaroonCreds = grpc.credentials.createFromMetadataGenerator(function(args, callback) {{"
    )?;
    writeln!(out, "  let metadata = new grpc.Metadata();")?;
    writeln!(out, "  metadata.add('macaroon', macaroon);")?;
    writeln!(out, "  callback(null, metadata);")?;
    writeln!(out, "}});")?;
    writeln!(
        out,
        "let creds = grpc.credentials.combineChannelCredentials(sslCreds, macaroonCreds);"
    )?;
    writeln!(
        out,
        "let client = new {}.{}('{}', creds);",
        pkg, target.service, GRPC_HOST
    )?;

    let fields: Vec<&Field> = request.fields.iter().collect();
    write_js_object(&mut out, "let request = ", &fields, ";")?;

    let call = target.method.to_lower_camel_case();
    match target.streaming {
        StreamingDirection::Unary => {
            writeln!(out, "client.{}(request, function(err, response) {{", call)?;
            writeln!(out, "  console.log(response);")?;
            writeln!(out, "}});")?;
        }
        StreamingDirection::Server => {
            writeln!(out, "let call = client.{}(request);", call)?;
            write_js_stream_handlers(&mut out)?;
        }
        StreamingDirection::Client => {
            writeln!(out, "let call = client.{}(function(err, response) {{", call)?;
            writeln!(out, "  console.log(response);")?;
            writeln!(out, "}});")?;
            writeln!(out, "call.write(request);")?;
            writeln!(out, "call.end();")?;
        }
        StreamingDirection::Bidirectional => {
            writeln!(out, "let call = client.{}({{}});", call)?;
            write_js_stream_handlers(&mut out)?;
            writeln!(out, "call.write(request);")?;
        }
    }

    Ok(out)
}

fn write_js_stream_handlers(out: &mut String) -> Result {
    writeln!(out, "call.on('data', function(response) {{")?;
    writeln!(out, "  // A response was received from the server.")?;
    writeln!(out, "  console.log(response);")?;
    writeln!(out, "}});")?;
    writeln!(out, "call.on('status', function(status) {{")?;
    writeln!(out, "  // The current status of the stream.")?;
    writeln!(out, "}});")?;
    writeln!(out, "call.on('end', function() {{")?;
    writeln!(out, "  // The server has closed the stream.")?;
    writeln!(out, "}});")
}

fn grpc_py(target: &Target, request: &Message) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();
    let module = &target.proto_module;

    writeln!(out, "import codecs, grpc, os")?;
    writeln!(
        out,
        "# Generate the following 2 modules by compiling the {} file",
        target.proto_file
    )?;
    writeln!(
        out,
        "import {}_pb2 as {}, {}_pb2_grpc as {}stub",
        module, target.package, module, module
    )?;
    writeln!(
        out,
        "macaroon = codecs.encode(open('{}', 'rb').read(), 'hex')",
        MACAROON_PATH
    )?;
    writeln!(out, "os.environ['GRPC_SSL_CIPHER_SUITES'] = 'HIGH+ECDSA'")?;
    writeln!(out, "cert = open('{}', 'rb').read()", TLS_CERT_PATH)?;
    writeln!(out, "ssl_creds = grpc.ssl_channel_credentials(cert)")?;
    writeln!(out, "channel = grpc.secure_channel('{}', ssl_creds)", GRPC_HOST)?;
    writeln!(out, "stub = {}stub.{}Stub(channel)", module, target.service)?;

    if request.fields.is_empty() {
        writeln!(out, "request = {}.{}()", target.package, request.name)?;
    } else {
        writeln!(out, "request = {}.{}(", target.package, request.name)?;
        for field in &request.fields {
            writeln!(out, "    {}={},", field.name, placeholder(field))?;
        }
        writeln!(out, ")")?;
    }

    let metadata = "metadata=[('macaroon', macaroon)]";
    match target.streaming {
        StreamingDirection::Unary => {
            writeln!(out, "response = stub.{}(request, {})", target.method, metadata)?;
            writeln!(out, "print(response)")?;
        }
        StreamingDirection::Server => {
            writeln!(out, "for response in stub.{}(request, {}):", target.method, metadata)?;
            writeln!(out, "    print(response)")?;
        }
        StreamingDirection::Client | StreamingDirection::Bidirectional => {
            writeln!(out, "def request_generator():")?;
            writeln!(out, "    yield request")?;
            writeln!(out, "request_iterable = request_generator()")?;
            if target.streaming == StreamingDirection::Client {
                writeln!(
                    out,
                    "response = stub.{}(request_iterable, {})",
                    target.method, metadata
                )?;
                writeln!(out, "print(response)")?;
            } else {
                writeln!(
                    out,
                    "for response in stub.{}(request_iterable, {}):",
                    target.method, metadata
                )?;
                writeln!(out, "    print(response)")?;
            }
        }
    }

    Ok(out)
}

fn rest_js(target: &Target, request: &Message) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();
    let body = fields_in(request, RestPlacement::Body);
    let query = fields_in(request, RestPlacement::Query);

    writeln!(out, "const fs = require('fs');")?;
    writeln!(out, "const request = require('request');")?;
    writeln!(
        out,
        "const macaroon = fs.readFileSync('{}').toString('hex');",
        MACAROON_PATH
    )?;
    if !body.is_empty() {
        write_js_object(&mut out, "let requestBody = ", &body, ";")?;
    }
    writeln!(out, "let options = {{")?;
    writeln!(out, "  url: 'https://{}{}',", REST_HOST, target.rest_path)?;
    writeln!(out, "  // Work-around for self-signed certificates.")?;
    writeln!(out, "  rejectUnauthorized: false,")?;
    writeln!(out, "  json: true,")?;
    writeln!(out, "  headers: {{")?;
    writeln!(out, "    'Grpc-Metadata-macaroon': macaroon,")?;
    writeln!(out, "  }},")?;
    if !query.is_empty() {
        let mut qs = String::new();
        write_js_object(&mut qs, "qs: ", &query, ",")?;
        for line in qs.lines() {
            writeln!(out, "  {}", line)?;
        }
    }
    if !body.is_empty() {
        writeln!(out, "  form: JSON.stringify(requestBody),")?;
    }
    writeln!(out, "}};")?;

    if target.streaming == StreamingDirection::Server {
        writeln!(out, "request.{}(options).on('data', function(chunk) {{", target.rest_verb)?;
        writeln!(out, "  // One JSON object per streamed response.")?;
        writeln!(out, "  console.log(chunk.toString());")?;
        writeln!(out, "}});")?;
    } else {
        writeln!(
            out,
            "request.{}(options, function(error, response, body) {{",
            target.rest_verb
        )?;
        writeln!(out, "  console.log(body);")?;
        writeln!(out, "}});")?;
    }

    Ok(out)
}

fn rest_py(target: &Target, request: &Message) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();
    let body = fields_in(request, RestPlacement::Body);
    let query = fields_in(request, RestPlacement::Query);
    let streaming = target.streaming == StreamingDirection::Server;

    writeln!(out, "import codecs, json, requests")?;
    writeln!(out, "url = 'https://{}{}'", REST_HOST, target.rest_path)?;
    writeln!(out, "cert_path = '{}'", TLS_CERT_PATH)?;
    writeln!(
        out,
        "macaroon = codecs.encode(open('{}', 'rb').read(), 'hex')",
        MACAROON_PATH
    )?;
    writeln!(out, "headers = {{'Grpc-Metadata-macaroon': macaroon}}")?;

    let mut arguments = vec!["url".to_string(), "headers=headers".to_string()];
    if !query.is_empty() {
        write_py_dict(&mut out, "params", &query)?;
        arguments.push("params=params".to_string());
    }
    if !body.is_empty() {
        write_py_dict(&mut out, "data", &body)?;
        arguments.push("data=json.dumps(data)".to_string());
    }
    arguments.push("verify=cert_path".to_string());
    if streaming {
        arguments.push("stream=True".to_string());
    }

    writeln!(out, "r = requests.{}({})", target.rest_verb, arguments.join(", "))?;
    if streaming {
        writeln!(out, "for raw_response in r.iter_lines():")?;
        writeln!(out, "    json_response = json.loads(raw_response)")?;
        writeln!(out, "    print(json_response)")?;
    } else {
        writeln!(out, "print(r.json())")?;
    }

    Ok(out)
}
